//! Builds the monitoring report document from a snapshot

use super::document::{Block, Cell, Document, Inline, Row, Table};
use super::ExportError;
use crate::persistence::Snapshot;
use crate::state::monitoring::{
    Grade, Subsidy, FACILITIES, FINDINGS, GRADES, PERMITS, PROGRAM_ROWS, SHS_LABS, SUBSIDIES,
    SUBSIDY_AFFIRMATIVE,
};

pub const REPORT_TITLE: &str = "MONITORING TOOL FOR PRIVATE SCHOOLS";

const BLANK: &str = "_________________";
const SHORT_BLANK: &str = "______";
const SIGNATURE_BLANK: &str = "_________________________________";
const COUNT_BLANK: &str = "__";
const SUBSIDY_BLANK: &str = "____";

/// Short program labels used by the accreditation and curriculum rows
const SHORT_PROGRAM_LABELS: [&str; 4] = ["Kindergarten", "Elementary", "JHS", "SHS"];

/// Typed access to snapshot values; every lookup fails on a missing key
struct Values<'a> {
    snapshot: &'a Snapshot,
}

impl Values<'_> {
    fn text(&self, name: &str) -> Result<String, ExportError> {
        self.snapshot
            .text(name)
            .ok_or_else(|| ExportError::MissingField(name.to_string()))
    }

    /// Text value, or `placeholder` when empty
    fn or(&self, name: &str, placeholder: &str) -> Result<String, ExportError> {
        let value = self.text(name)?;
        Ok(if value.is_empty() {
            placeholder.to_string()
        } else {
            value
        })
    }

    fn value(&self, name: &str) -> Result<Inline, ExportError> {
        self.text(name).map(Inline::Value)
    }

    fn value_or(&self, name: &str, placeholder: &str) -> Result<Inline, ExportError> {
        self.or(name, placeholder).map(Inline::Value)
    }

    fn flag(&self, name: &str) -> Result<Inline, ExportError> {
        self.snapshot
            .flag(name)
            .map(Inline::Checkbox)
            .ok_or_else(|| ExportError::MissingField(name.to_string()))
    }

    /// Checkbox ticked when a choice field holds `option`
    fn picked(&self, name: &str, option: &str) -> Result<Inline, ExportError> {
        Ok(Inline::Checkbox(self.text(name)? == option))
    }
}

fn heading_row(label: &str) -> Row {
    vec![Cell::new(vec![Inline::strong(label)]).span(3)]
}

fn full_row(inlines: Vec<Inline>) -> Row {
    vec![Cell::new(inlines).span(3)]
}

/// Build the report for `snapshot`
pub fn build_report(snapshot: &Snapshot) -> Result<Document, ExportError> {
    let v = Values { snapshot };
    let mut doc = Document::new(REPORT_TITLE);
    doc.push(Block::Title(REPORT_TITLE.to_string()));
    doc.push(Block::SectionTitle("PART 1: SCHOOL PROFILE".into()));
    doc.push(Block::Note(
        "(Part 1 of this Monitoring Tool should be accomplished by the school)".into(),
    ));
    doc.push(Block::Table(school_profile(&v)?));

    doc.push(Block::SectionTitle("PART 2: PHYSICAL PLANT & FACILITIES".into()));
    doc.push(Block::Note(
        "(Parts 2, 3 & 4 are to be accomplished on the actual day of monitoring)".into(),
    ));
    doc.push(Block::Table(physical_plant(&v)?));

    doc.push(Block::SectionTitle("PART 3: OTHER FINDINGS:".into()));
    doc.push(Block::Note(
        "(Remarks and observations on the day of actual visit)".into(),
    ));
    doc.push(Block::Paragraph(vec![v.value("generalObservations")?]));

    doc.push(Block::SectionTitle(
        "PART 4: STATUS OF THE SIGNIFICANT FINDINGS OF THE MONITORING TEAM DURING THE PREVIOUS MONITORING."
            .into(),
    ));
    doc.push(Block::Table(previous_findings(&v)?));

    signatures(&v, &mut doc)?;
    Ok(doc)
}

fn school_profile(v: &Values) -> Result<Table, ExportError> {
    let mut rows = vec![
        heading_row("Schools Division Office"),
        full_row(vec![v.value("sdo")?]),
        heading_row("Classification According to Offering"),
        full_row(vec![
            v.flag("classNonSectarian")?,
            Inline::text(" Non-Sectarian"),
            Inline::Gap,
            v.flag("classSectarian")?,
            Inline::text(" Sectarian"),
        ]),
        heading_row("School Registered Name in SEC"),
        full_row(vec![v.value("schoolNameSec")?]),
        heading_row("School Name in DepEd Permit/Recognition"),
        full_row(vec![v.value("schoolNameDeped")?]),
        heading_row("Complete Address:"),
        full_row(vec![v.value("address")?]),
        heading_row("Email Address:"),
        full_row(vec![v.value("email")?]),
        vec![
            Cell::new(vec![
                Inline::strong("School ID Number:"),
                Inline::Break,
                v.value("schoolId")?,
            ]),
            Cell::new(vec![
                Inline::strong("LIS Account Status"),
                Inline::Break,
                v.picked("lisStatus", "Active")?,
                Inline::text(" Active"),
                Inline::Break,
                v.picked("lisStatus", "Not Active")?,
                Inline::text(" Not Active"),
            ]),
            Cell::new(vec![
                Inline::strong("School Contact No."),
                Inline::Break,
                v.value("contactNumber")?,
            ]),
        ],
        full_row(vec![
            Inline::strong("Program Offering"),
            Inline::Break,
            Inline::emphasis(
                "(Check if Government Authority certificates are displayed in a conspicuous place in school e.g. Administration Office)",
            ),
        ]),
        vec![
            Cell::new(program_permits(v)?).span(2),
            Cell::with_blocks(other_programs(v)?),
        ],
        heading_row("School Administration"),
        full_row(vec![
            Inline::strong("Name of School Head/President/CEO:"),
            Inline::text(" "),
            v.value("schoolHeadCEO")?,
            Inline::Break,
            Inline::strong("Name of School Principal:"),
            Inline::text(" "),
            v.value("schoolPrincipal")?,
        ]),
        heading_row("Total Number of Learners Registered in the LIS"),
        vec![Cell::with_blocks(vec![Block::Table(grade_table(v, |g| g.lis_field)?)]).span(3)],
        heading_row("Total Number of Learners Head Counts"),
        vec![Cell::with_blocks(vec![Block::Table(grade_table(v, |g| g.warm_field)?)]).span(3)],
        heading_row("Total Number of Learners Recipients of Government Subsidies"),
        full_row(subsidies(v)?),
        heading_row("Total Number of Teachers"),
        vec![Cell::with_blocks(vec![Block::Table(teachers(v)?)]).span(3)],
        heading_row(
            "Existence of School Child Protection and/or Anti-Bullying Policy and Committee",
        ),
        full_row(vec![
            Inline::text("Yes: "),
            v.picked("childProtection", "Yes")?,
            Inline::Gap,
            Inline::text("No: "),
            v.picked("childProtection", "No")?,
        ]),
        heading_row("Learning Modalities Used"),
        full_row(vec![
            v.flag("modalInPerson")?,
            Inline::text(" a. In-Person"),
            Inline::Break,
            v.flag("modalBlended")?,
            Inline::text(" b. Blended Learning Modality"),
            Inline::Break,
            v.flag("modalDistance")?,
            Inline::text(" c. Full Distance"),
            Inline::Break,
            Inline::Break,
            Inline::text("Grade Level/s Offered: "),
            v.value_or("modalGradeLevels", BLANK)?,
            Inline::Break,
            Inline::Break,
            Inline::text("Learning Management System (LMS) Used: "),
            v.value_or("lmsUsed", BLANK)?,
        ]),
        heading_row("Compliance to K to 12 Curriculum / Class Programs"),
    ];

    let mut curriculum = Vec::new();
    for (row, label) in PROGRAM_ROWS.iter().zip(SHORT_PROGRAM_LABELS) {
        if !curriculum.is_empty() {
            curriculum.push(Inline::Break);
        }
        curriculum.extend([
            Inline::text(format!("{label} ")),
            v.picked(row.curriculum, "Yes")?,
            Inline::text(" Yes "),
            v.picked(row.curriculum, "No")?,
            Inline::text(" No"),
        ]);
    }
    rows.push(full_row(curriculum));

    rows.push(heading_row("School Facilities"));
    rows.push(full_row(vec![
        Inline::text("No. of Instructional Rooms: "),
        v.value_or("numInstructionalRooms", BLANK)?,
        Inline::Break,
        Inline::text("Classroom Size in sqm (average): "),
        v.value_or("classroomSize", BLANK)?,
        Inline::Break,
        Inline::text("Total Floor Area in square meter: "),
        v.value_or("totalFloorArea", BLANK)?,
        Inline::Break,
        Inline::text("School Lot Area in square meter: "),
        v.value_or("schoolLotArea", BLANK)?,
    ]));
    Ok(Table::new(rows))
}

fn program_permits(v: &Values) -> Result<Vec<Inline>, ExportError> {
    let mut out = Vec::new();
    for (i, permit) in PERMITS.iter().enumerate() {
        if i > 0 {
            out.extend([Inline::Break, Inline::Break]);
        }
        out.extend([
            v.flag(permit.offered)?,
            Inline::text(" "),
            Inline::strong(permit.label),
            Inline::Break,
            Inline::text("__ Permit No. "),
            v.value_or(permit.permit_no, BLANK)?,
            Inline::Break,
            Inline::text("Date Issued "),
            v.value_or(permit.permit_date, BLANK)?,
        ]);
        if let Some((number, issued)) = permit.recognition {
            out.extend([
                Inline::Break,
                Inline::text("__ Recognition No. "),
                v.value_or(number, BLANK)?,
                Inline::Break,
                Inline::text("Date Issued "),
                v.value_or(issued, BLANK)?,
            ]);
        }
        if let Some(valid_until) = permit.valid_until {
            out.extend([
                Inline::Break,
                Inline::text("Valid until "),
                v.value_or(valid_until, BLANK)?,
            ]);
        }
    }
    Ok(out)
}

fn other_programs(v: &Values) -> Result<Vec<Block>, ExportError> {
    let programs = vec![
        v.flag("progSHS")?,
        Inline::text(" "),
        Inline::strong("Senior High School"),
        Inline::Break,
        Inline::text("Program Offerings (Track & Strand, Specialization, Date Issued)"),
        Inline::Break,
        Inline::text("1. "),
        v.value_or("shsProgram1", BLANK)?,
        Inline::Break,
        Inline::text("2. "),
        v.value_or("shsProgram2", BLANK)?,
        Inline::Break,
        Inline::text("3. "),
        v.value_or("shsProgram3", BLANK)?,
        Inline::Break,
        Inline::Break,
        v.flag("isInternational")?,
        Inline::text(" "),
        Inline::strong("School Identified as \"International School\" (IS)"),
        Inline::Break,
        Inline::text("____ by Name (uses \"International\"): "),
        v.value_or("intlByName", SHORT_BLANK)?,
        Inline::Break,
        Inline::text("____ Through Legislation: "),
        v.value_or("intlLegislation", SHORT_BLANK)?,
        Inline::Break,
        Inline::Break,
        v.flag("isHEI")?,
        Inline::text(" "),
        Inline::strong("Higher Education Institution (HEI) with K to 12 and Program Offering"),
        Inline::Break,
        Inline::Break,
        Inline::strong("Accreditation Status (FAAP)"),
    ];

    let mut accreditation = Vec::new();
    for (row, label) in PROGRAM_ROWS.iter().zip(SHORT_PROGRAM_LABELS) {
        accreditation.push(vec![
            Cell::new(vec![Inline::text(label)]),
            Cell::new(vec![v.value(row.accred_level)?]),
            Cell::new(vec![v.value(row.accred_valid)?]),
        ]);
    }
    accreditation.push(vec![
        Cell::new(vec![Inline::text("Complete Basic Ed. Program")]),
        Cell::new(vec![v.value("accredCompleteLevel")?]),
        Cell::new(vec![v.value("accredCompleteValid")?]),
    ]);
    let table = Table::new(accreditation).with_head(vec![
        Cell::header("Program"),
        Cell::header("Level"),
        Cell::header("Valid Until"),
    ]);

    Ok(vec![
        Block::Inline(programs),
        Block::Table(table),
        Block::Inline(vec![
            Inline::strong("Accrediting Agency:"),
            Inline::text(" "),
            v.value_or("accreditingAgency", BLANK)?,
        ]),
    ])
}

/// Two-column grade table: Kinder to Grade 6 on the left, Grades 7 to 12
/// on the right
fn grade_table(v: &Values, field: fn(&Grade) -> &'static str) -> Result<Table, ExportError> {
    let (left, right) = GRADES.split_at(7);
    let mut rows = Vec::new();
    for (i, grade) in left.iter().enumerate() {
        let mut row = vec![Cell::new(vec![
            Inline::text(format!("{}: ", grade.label)),
            v.value_or(field(grade), COUNT_BLANK)?,
        ])];
        row.push(match right.get(i) {
            Some(grade) => Cell::new(vec![
                Inline::text(format!("{}: ", grade.label)),
                v.value_or(field(grade), COUNT_BLANK)?,
            ]),
            None => Cell::new(Vec::new()),
        });
        rows.push(row);
    }
    Ok(Table::new(rows))
}

/// `Voucher: Yes - N recipients`, `Voucher: No` or `Voucher: ____`
fn subsidy(v: &Values, subsidy: &Subsidy) -> Result<Inline, ExportError> {
    let offered = v.text(subsidy.offered)?;
    let text = match offered.as_str() {
        SUBSIDY_AFFIRMATIVE => format!(
            "{}: Yes - {} recipients",
            subsidy.label,
            v.or(subsidy.count, "0")?
        ),
        "no" => format!("{}: No", subsidy.label),
        _ => format!("{}: {SUBSIDY_BLANK}", subsidy.label),
    };
    Ok(Inline::Value(text))
}

fn subsidies(v: &Values) -> Result<Vec<Inline>, ExportError> {
    let mut out = Vec::new();
    for s in &SUBSIDIES {
        if !out.is_empty() {
            out.push(Inline::Gap);
        }
        out.push(subsidy(v, s)?);
    }
    Ok(out)
}

fn teachers(v: &Values) -> Result<Table, ExportError> {
    let mut rows = Vec::new();
    for row in &PROGRAM_ROWS {
        rows.push(vec![
            Cell::new(vec![Inline::text(row.label)]),
            Cell::new(vec![v.value_or(row.lpt, "0")?]),
            Cell::new(vec![v.value_or(row.non_lpt, "0")?]),
        ]);
    }
    Ok(Table::new(rows).with_head(vec![
        Cell::header("Grade Level"),
        Cell::header("Total With LPT"),
        Cell::header("Total Non-Licensed"),
    ]))
}

fn physical_plant(v: &Values) -> Result<Table, ExportError> {
    let mut rows = Vec::new();
    for facility in &FACILITIES {
        let mut label = vec![Inline::text(facility.label)];
        if facility.evident == "fac_science_evident" {
            label.extend([Inline::Break, Inline::text("SHS STEM -- min. of 3 laboratories")]);
        }
        rows.push(vec![
            Cell::new(label),
            Cell::new(vec![v.flag(facility.evident)?]).centered(),
            Cell::new(vec![v.flag(facility.not_evident)?]).centered(),
            Cell::new(vec![v.value(facility.remarks)?]),
        ]);
    }

    let mut labs = vec![
        Inline::strong("Other SHS Laboratories"),
        Inline::Break,
        v.flag("shsLabTVL")?,
        Inline::text(" TVL Track (specify lab): "),
        v.value("shsLabTVLDetails")?,
    ];
    for (name, label) in &SHS_LABS {
        labs.extend([Inline::Break, v.flag(name)?, Inline::text(format!(" {label}"))]);
    }
    rows.push(vec![Cell::new(labs).span(4)]);
    rows.push(vec![Cell::new(vec![v.value("shsLabRemarks")?]).span(4)]);

    Ok(Table::new(rows).with_head(vec![
        Cell::header("Facilities"),
        Cell::header("Evident"),
        Cell::header("Not Evident"),
        Cell::header("Remarks"),
    ]))
}

fn previous_findings(v: &Values) -> Result<Table, ExportError> {
    let mut rows = Vec::new();
    for (finding, status) in &FINDINGS {
        rows.push(vec![
            Cell::new(vec![v.value(finding)?]),
            Cell::new(vec![v.value(status)?]),
        ]);
    }
    Ok(Table::new(rows).with_head(vec![
        Cell::header("ADVERSE/SIGNIFICANT FINDINGS"),
        Cell::header("STATUS/UPDATE"),
    ]))
}

fn signatures(v: &Values, doc: &mut Document) -> Result<(), ExportError> {
    doc.push(Block::Paragraph(vec![
        Inline::text("Date Inspected/Monitored: "),
        v.value_or("monitorDate", BLANK)?,
    ]));
    doc.push(Block::Paragraph(vec![Inline::strong("Prepared by:")]));
    doc.push(Block::Paragraph(vec![
        v.value_or("monitorName", SIGNATURE_BLANK)?,
        Inline::Break,
        Inline::emphasis("Signature Over Printed Name of Monitor"),
        Inline::Gap,
        Inline::emphasis("Position: "),
        v.value_or("monitorPosition", BLANK)?,
    ]));
    doc.push(Block::Paragraph(vec![
        Inline::strong("SDO Office/Unit"),
        Inline::text(" "),
        v.value_or("sdoOfficeUnit", SIGNATURE_BLANK)?,
    ]));
    doc.push(Block::Paragraph(vec![Inline::strong("Conforme:")]));
    doc.push(Block::Paragraph(vec![
        v.value_or("schoolHeadName", SIGNATURE_BLANK)?,
        Inline::Break,
        Inline::emphasis("Signature Over Printed Name of School Head"),
    ]));
    doc.push(Block::Paragraph(vec![
        Inline::text("Date: "),
        v.value_or("conformeDate", BLANK)?,
    ]));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::capture;
    use crate::state::monitoring::monitoring_schema;
    use crate::state::{FieldValue, MonitoringForm};

    fn form() -> MonitoringForm {
        MonitoringForm::new(monitoring_schema()).unwrap()
    }

    fn report_text(form: &MonitoringForm) -> String {
        build_report(&capture(form)).unwrap().plain_text()
    }

    #[test]
    fn test_empty_form_builds() {
        let doc = build_report(&capture(&form())).unwrap();
        assert_eq!(doc.title, REPORT_TITLE);
        assert!(matches!(doc.blocks.first(), Some(Block::Title(_))));
    }

    #[test]
    fn test_empty_values_use_placeholders() {
        let text = report_text(&form());
        assert!(text.contains(&format!("Grade Level/s Offered: {BLANK}")));
        assert!(text.contains(&format!("Grade 7: {COUNT_BLANK}")));
        assert!(text.contains(&format!("Date: {BLANK}")));
    }

    #[test]
    fn test_checkbox_glyphs() {
        let mut form = form();
        form.set_value("classSectarian", FieldValue::Flag(true)).unwrap();
        let text = report_text(&form);
        assert!(text.contains("☐ Non-Sectarian"));
        assert!(text.contains("☑ Sectarian"));
    }

    #[test]
    fn test_choice_rendered_as_checkboxes() {
        let mut form = form();
        form.set_value("lisStatus", FieldValue::choice("Not Active")).unwrap();
        form.set_value("curriculumJHS", FieldValue::choice("Yes")).unwrap();
        let text = report_text(&form);
        assert!(text.contains("☐ Active\n☑ Not Active"));
        assert!(text.contains("JHS ☑ Yes ☐ No"));
    }

    mod subsidies {
        use super::*;

        #[test]
        fn test_three_states() {
            let mut form = form();
            form.set_value("voucherOffered", FieldValue::choice("yes")).unwrap();
            form.set_value("voucherCount", FieldValue::text("25")).unwrap();
            form.set_value("escOffered", FieldValue::choice("no")).unwrap();
            let text = report_text(&form);
            assert!(text.contains("Voucher: Yes - 25 recipients"));
            assert!(text.contains("ESC: No"));
            assert!(text.contains("JDVP: ____"));
        }

        #[test]
        fn test_yes_without_count_reads_zero() {
            let mut form = form();
            form.set_value("jdvpOffered", FieldValue::choice("yes")).unwrap();
            assert!(report_text(&form).contains("JDVP: Yes - 0 recipients"));
        }
    }

    #[test]
    fn test_multiline_findings_keep_line_breaks() {
        let mut form = form();
        form.set_value("finding2", FieldValue::text("No fire drill\nExpired permit"))
            .unwrap();
        assert!(report_text(&form).contains("No fire drill\nExpired permit"));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let mut snapshot = capture(&form());
        let mut trimmed = Snapshot::new();
        for (name, value) in snapshot.iter() {
            if name != "schoolLotArea" {
                trimmed.insert(name, value.clone());
            }
        }
        snapshot = trimmed;
        assert!(matches!(
            build_report(&snapshot),
            Err(ExportError::MissingField(name)) if name == "schoolLotArea"
        ));
    }

    #[test]
    fn test_teacher_counts_default_to_zero() {
        let mut form = form();
        form.set_value("shsLPT", FieldValue::text("9")).unwrap();
        let doc = build_report(&capture(&form)).unwrap();
        let values: Vec<&Inline> = doc.inlines().collect();
        assert!(values.contains(&&Inline::Value("9".into())));
        assert!(values.contains(&&Inline::Value("0".into())));
    }
}
