//! The private school monitoring tool form

use super::field::FieldKind;
use super::schema::{FieldDecl, FormSchema, SectionDecl};
use crate::visibility::{Category, ChoiceGroup, ExclusivePair, TargetId, VisibilityTarget};

pub const YES_NO_LOWER: &[&str] = &["yes", "no"];
pub const YES_NO: &[&str] = &["Yes", "No"];
pub const LIS_STATUS: &[&str] = &["Active", "Not Active"];
pub const ACCREDITATION_LEVELS: &[&str] = &["Level I", "Level II", "Level III", "Level IV"];

/// Affirmative answer of the subsidy choice groups
pub const SUBSIDY_AFFIRMATIVE: &str = "yes";

/// A facility item observed on the day of monitoring
#[derive(Debug, Clone, Copy)]
pub struct Facility {
    pub label: &'static str,
    pub evident: &'static str,
    pub not_evident: &'static str,
    pub remarks: &'static str,
}

const fn facility(
    label: &'static str,
    evident: &'static str,
    not_evident: &'static str,
    remarks: &'static str,
) -> Facility {
    Facility {
        label,
        evident,
        not_evident,
        remarks,
    }
}

pub const FACILITIES: [Facility; 20] = [
    facility("School building/s", "fac_building_evident", "fac_building_not", "fac_building_remarks"),
    facility("Activity/Athletics Area", "fac_athletics_evident", "fac_athletics_not", "fac_athletics_remarks"),
    facility("Playground", "fac_playground_evident", "fac_playground_not", "fac_playground_remarks"),
    facility("Classrooms", "fac_classrooms_evident", "fac_classrooms_not", "fac_classrooms_remarks"),
    facility("Medical and Dental Clinic", "fac_clinic_evident", "fac_clinic_not", "fac_clinic_remarks"),
    facility("Library/Learning Resource Center", "fac_library_evident", "fac_library_not", "fac_library_remarks"),
    facility("Computer Laboratory", "fac_computer_evident", "fac_computer_not", "fac_computer_remarks"),
    facility("Registrar's Office", "fac_registrar_evident", "fac_registrar_not", "fac_registrar_remarks"),
    facility("Faculty Room", "fac_faculty_evident", "fac_faculty_not", "fac_faculty_remarks"),
    facility("Guidance & Counselling Office (from Gr. 1)", "fac_guidance_evident", "fac_guidance_not", "fac_guidance_remarks"),
    facility("Canteen", "fac_canteen_evident", "fac_canteen_not", "fac_canteen_remarks"),
    facility("Principal's Office", "fac_principal_evident", "fac_principal_not", "fac_principal_remarks"),
    facility("Science Laboratory/ies (from Gr. 4)", "fac_science_evident", "fac_science_not", "fac_science_remarks"),
    facility("Practice House & Industrial Arts Area (from Gr. 4)", "fac_practice_evident", "fac_practice_not", "fac_practice_remarks"),
    facility("Emergency equipment", "fac_emergency_evident", "fac_emergency_not", "fac_emergency_remarks"),
    facility("Emergency Signages", "fac_signages_evident", "fac_signages_not", "fac_signages_remarks"),
    facility("Fire Exit", "fac_fireexit_evident", "fac_fireexit_not", "fac_fireexit_remarks"),
    facility("Male Restroom", "fac_malerest_evident", "fac_malerest_not", "fac_malerest_remarks"),
    facility("Female Restroom", "fac_femalerest_evident", "fac_femalerest_not", "fac_femalerest_remarks"),
    facility("Other Facilities", "fac_other_evident", "fac_other_not", "fac_other_remarks"),
];

/// A grade level and the program category it belongs to
#[derive(Debug, Clone, Copy)]
pub struct Grade {
    pub label: &'static str,
    pub lis_field: &'static str,
    pub warm_field: &'static str,
    pub category: Category,
}

const fn grade(
    label: &'static str,
    lis_field: &'static str,
    warm_field: &'static str,
    category: Category,
) -> Grade {
    Grade {
        label,
        lis_field,
        warm_field,
        category,
    }
}

pub const GRADES: [Grade; 13] = [
    grade("Kinder", "lisKinder", "warmKinder", Category::Kindergarten),
    grade("Grade 1", "lisGrade1", "warmGrade1", Category::Elementary),
    grade("Grade 2", "lisGrade2", "warmGrade2", Category::Elementary),
    grade("Grade 3", "lisGrade3", "warmGrade3", Category::Elementary),
    grade("Grade 4", "lisGrade4", "warmGrade4", Category::Elementary),
    grade("Grade 5", "lisGrade5", "warmGrade5", Category::Elementary),
    grade("Grade 6", "lisGrade6", "warmGrade6", Category::Elementary),
    grade("Grade 7", "lisGrade7", "warmGrade7", Category::Jhs),
    grade("Grade 8", "lisGrade8", "warmGrade8", Category::Jhs),
    grade("Grade 9", "lisGrade9", "warmGrade9", Category::Jhs),
    grade("Grade 10", "lisGrade10", "warmGrade10", Category::Jhs),
    grade("Grade 11", "lisGrade11", "warmGrade11", Category::Shs),
    grade("Grade 12", "lisGrade12", "warmGrade12", Category::Shs),
];

/// Per-program rows shared by the accreditation, teacher and curriculum tables
#[derive(Debug, Clone, Copy)]
pub struct ProgramRow {
    pub label: &'static str,
    pub category: Category,
    pub accred_level: &'static str,
    pub accred_valid: &'static str,
    pub lpt: &'static str,
    pub non_lpt: &'static str,
    pub curriculum: &'static str,
}

pub const PROGRAM_ROWS: [ProgramRow; 4] = [
    ProgramRow {
        label: "Kindergarten",
        category: Category::Kindergarten,
        accred_level: "accredKinderLevel",
        accred_valid: "accredKinderValid",
        lpt: "kinderLPT",
        non_lpt: "kinderNonLPT",
        curriculum: "curriculumKinder",
    },
    ProgramRow {
        label: "Elementary",
        category: Category::Elementary,
        accred_level: "accredElemLevel",
        accred_valid: "accredElemValid",
        lpt: "elemLPT",
        non_lpt: "elemNonLPT",
        curriculum: "curriculumElem",
    },
    ProgramRow {
        label: "Junior High School (JHS)",
        category: Category::Jhs,
        accred_level: "accredJHSLevel",
        accred_valid: "accredJHSValid",
        lpt: "jhsLPT",
        non_lpt: "jhsNonLPT",
        curriculum: "curriculumJHS",
    },
    ProgramRow {
        label: "Senior High School (SHS)",
        category: Category::Shs,
        accred_level: "accredSHSLevel",
        accred_valid: "accredSHSValid",
        lpt: "shsLPT",
        non_lpt: "shsNonLPT",
        curriculum: "curriculumSHS",
    },
];

/// Permit and recognition fields of a program offering
#[derive(Debug, Clone, Copy)]
pub struct Permit {
    pub label: &'static str,
    pub category: Category,
    pub offered: &'static str,
    pub permit_no: &'static str,
    pub permit_date: &'static str,
    /// Recognition number and date; homeschooling has a validity date instead
    pub recognition: Option<(&'static str, &'static str)>,
    pub valid_until: Option<&'static str>,
}

pub const PERMITS: [Permit; 5] = [
    Permit {
        label: "Kindergarten",
        category: Category::Kindergarten,
        offered: "progKinder",
        permit_no: "kinderPermitNo",
        permit_date: "kinderPermitDate",
        recognition: Some(("kinderRecogNo", "kinderRecogDate")),
        valid_until: None,
    },
    Permit {
        label: "Elementary",
        category: Category::Elementary,
        offered: "progElem",
        permit_no: "elemPermitNo",
        permit_date: "elemPermitDate",
        recognition: Some(("elemRecogNo", "elemRecogDate")),
        valid_until: None,
    },
    Permit {
        label: "Junior High School",
        category: Category::Jhs,
        offered: "progJHS",
        permit_no: "jhsPermitNo",
        permit_date: "jhsPermitDate",
        recognition: Some(("jhsRecogNo", "jhsRecogDate")),
        valid_until: None,
    },
    Permit {
        label: "SPED/SNEd Program",
        category: Category::Sped,
        offered: "progSPED",
        permit_no: "spedPermitNo",
        permit_date: "spedPermitDate",
        recognition: Some(("spedRecogNo", "spedRecogDate")),
        valid_until: None,
    },
    Permit {
        label: "Homeschooling Program",
        category: Category::Homeschool,
        offered: "progHomeschool",
        permit_no: "homePermitNo",
        permit_date: "homePermitDate",
        recognition: None,
        valid_until: Some("homeValidUntil"),
    },
];

/// Subsidy programs gated by a yes/no choice
#[derive(Debug, Clone, Copy)]
pub struct Subsidy {
    pub label: &'static str,
    pub offered: &'static str,
    pub count: &'static str,
}

pub const SUBSIDIES: [Subsidy; 3] = [
    Subsidy {
        label: "Voucher",
        offered: "voucherOffered",
        count: "voucherCount",
    },
    Subsidy {
        label: "ESC",
        offered: "escOffered",
        count: "escCount",
    },
    Subsidy {
        label: "JDVP",
        offered: "jdvpOffered",
        count: "jdvpCount",
    },
];

/// SHS laboratory checkboxes with their labels
pub const SHS_LABS: [(&str, &str); 7] = [
    ("shsLabHE", "HE"),
    ("shsLabICT", "ICT"),
    ("shsLabIA", "IA"),
    ("shsLabAFA", "AFA"),
    ("shsLabArts", "Arts & Design Track"),
    ("shsLabSports", "Sports Track"),
    ("shsLabUnique", "Unique Track"),
];

pub const FINDINGS: [(&str, &str); 3] = [
    ("finding1", "status1"),
    ("finding2", "status2"),
    ("finding3", "status3"),
];

pub const ACCREDITATION_SECTION: TargetId = "accreditationSection";
pub const TEACHERS_SECTION: TargetId = "teachersSection";
pub const CURRICULUM_SECTION: TargetId = "curriculumSection";
pub const SHS_LABS_SECTION: TargetId = "shsLabsSection";
pub const ACCRED_COMPLETE_ROW: TargetId = "accredCompleteRow";

pub fn program_section(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "programKindergarten",
        Category::Elementary => "programElementary",
        Category::Jhs => "programJhs",
        Category::Shs => "programShs",
        Category::Sped => "programSped",
        Category::Homeschool => "programHomeschool",
        Category::Hei => "programHei",
        Category::International => "programInternational",
    }
}

fn accred_row(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "accredKinderRow",
        Category::Elementary => "accredElemRow",
        Category::Jhs => "accredJhsRow",
        _ => "accredShsRow",
    }
}

fn lis_band(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "lisKinderFields",
        Category::Elementary => "lisElemFields",
        Category::Jhs => "lisJhsFields",
        _ => "lisShsFields",
    }
}

fn warm_band(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "warmKinderFields",
        Category::Elementary => "warmElemFields",
        Category::Jhs => "warmJhsFields",
        _ => "warmShsFields",
    }
}

fn teacher_row(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "teacherKinderRow",
        Category::Elementary => "teacherElemRow",
        Category::Jhs => "teacherJhsRow",
        _ => "teacherShsRow",
    }
}

fn curriculum_field(category: Category) -> TargetId {
    match category {
        Category::Kindergarten => "curriculumKinderField",
        Category::Elementary => "curriculumElemField",
        Category::Jhs => "curriculumJhsField",
        _ => "curriculumShsField",
    }
}

fn targets() -> Vec<VisibilityTarget> {
    let basic = &Category::BASIC_EDUCATION;
    let mut targets: Vec<VisibilityTarget> = Category::ALL
        .iter()
        .map(|c| VisibilityTarget::single(program_section(*c), *c))
        .collect();
    for category in basic {
        targets.push(VisibilityTarget::single(accred_row(*category), *category));
        targets.push(VisibilityTarget::single(lis_band(*category), *category));
        targets.push(VisibilityTarget::single(warm_band(*category), *category));
        targets.push(VisibilityTarget::single(teacher_row(*category), *category));
        targets.push(VisibilityTarget::single(curriculum_field(*category), *category));
    }
    targets.push(VisibilityTarget::any(ACCRED_COMPLETE_ROW, basic));
    targets.push(VisibilityTarget::any(ACCREDITATION_SECTION, basic));
    targets.push(VisibilityTarget::any(TEACHERS_SECTION, basic));
    targets.push(VisibilityTarget::any(CURRICULUM_SECTION, basic));
    targets.push(VisibilityTarget::single(SHS_LABS_SECTION, Category::Shs));
    targets
}

fn section(
    id: &'static str,
    title: &'static str,
    target: Option<TargetId>,
    fields: Vec<FieldDecl>,
) -> SectionDecl {
    SectionDecl {
        id,
        title,
        target,
        fields,
    }
}

fn text(name: &'static str, label: &'static str) -> FieldDecl {
    FieldDecl::new(name, label, FieldKind::Text)
}

fn number(name: &'static str, label: &'static str) -> FieldDecl {
    FieldDecl::new(name, label, FieldKind::Number)
}

fn date(name: &'static str, label: &'static str) -> FieldDecl {
    FieldDecl::new(name, label, FieldKind::Date)
}

fn checkbox(name: &'static str, label: &'static str) -> FieldDecl {
    FieldDecl::new(name, label, FieldKind::Boolean)
}

fn notes(name: &'static str, label: &'static str) -> FieldDecl {
    FieldDecl::new(name, label, FieldKind::Multiline)
}

fn permit_section(permit: &Permit) -> SectionDecl {
    let mut fields = vec![
        checkbox(permit.offered, "Offered"),
        text(permit.permit_no, "Permit No."),
        date(permit.permit_date, "Permit Date Issued"),
    ];
    if let Some((number, issued)) = permit.recognition {
        fields.push(text(number, "Recognition No."));
        fields.push(date(issued, "Recognition Date Issued"));
    }
    if let Some(valid_until) = permit.valid_until {
        fields.push(date(valid_until, "Valid until"));
    }
    section(
        program_section(permit.category),
        permit.label,
        Some(program_section(permit.category)),
        fields,
    )
}

/// Build the monitoring tool schema
pub fn monitoring_schema() -> FormSchema {
    let mut sections = vec![
        section(
            "filters",
            "Program Filters",
            None,
            Category::ALL
                .iter()
                .map(|c| checkbox(c.toggle_field(), c.label()))
                .collect(),
        ),
        section(
            "profile",
            "School Profile",
            None,
            vec![
                text("sdo", "Schools Division Office"),
                checkbox("classNonSectarian", "Non-Sectarian"),
                checkbox("classSectarian", "Sectarian"),
                text("schoolNameSec", "School Registered Name in SEC"),
                text("schoolNameDeped", "School Name in DepEd Permit/Recognition"),
                text("address", "Complete Address"),
                text("email", "Email Address"),
                text("schoolId", "School ID Number"),
                FieldDecl::new("lisStatus", "LIS Account Status", FieldKind::Choice(LIS_STATUS)),
                text("contactNumber", "School Contact No."),
            ],
        ),
    ];

    sections.extend(PERMITS[..3].iter().map(permit_section));
    sections.push(section(
        program_section(Category::Shs),
        "Senior High School",
        Some(program_section(Category::Shs)),
        vec![
            checkbox("progSHS", "Offered"),
            text("shsProgram1", "Program Offering 1 (Track & Strand, Specialization, Date Issued)"),
            text("shsProgram2", "Program Offering 2"),
            text("shsProgram3", "Program Offering 3"),
        ],
    ));
    sections.extend(PERMITS[3..].iter().map(permit_section));
    sections.push(section(
        program_section(Category::International),
        "International School",
        Some(program_section(Category::International)),
        vec![
            checkbox("isInternational", "Identified as \"International School\" (IS)"),
            text("intlByName", "By Name (uses \"International\")"),
            text("intlLegislation", "Through Legislation"),
        ],
    ));
    sections.push(section(
        program_section(Category::Hei),
        "Higher Education Institution",
        Some(program_section(Category::Hei)),
        vec![checkbox("isHEI", "HEI with K to 12 and Program Offering")],
    ));

    let mut accreditation: Vec<FieldDecl> = PROGRAM_ROWS
        .iter()
        .flat_map(|row| {
            [
                FieldDecl::new(
                    row.accred_level,
                    row.label,
                    FieldKind::Select(ACCREDITATION_LEVELS),
                )
                .owned_by(accred_row(row.category)),
                date(row.accred_valid, "Valid Until").owned_by(accred_row(row.category)),
            ]
        })
        .collect();
    accreditation.push(
        FieldDecl::new(
            "accredCompleteLevel",
            "Complete Basic Ed. Program",
            FieldKind::Select(ACCREDITATION_LEVELS),
        )
        .owned_by(ACCRED_COMPLETE_ROW),
    );
    accreditation.push(date("accredCompleteValid", "Valid Until").owned_by(ACCRED_COMPLETE_ROW));
    accreditation.push(text("accreditingAgency", "Accrediting Agency"));
    sections.push(section(
        "accreditation",
        "Accreditation Status (FAAP)",
        Some(ACCREDITATION_SECTION),
        accreditation,
    ));

    sections.push(section(
        "administration",
        "School Administration",
        None,
        vec![
            text("schoolHeadCEO", "Name of School Head/President/CEO"),
            text("schoolPrincipal", "Name of School Principal"),
        ],
    ));
    sections.push(section(
        "lis",
        "Learners Registered in the LIS",
        None,
        GRADES
            .iter()
            .map(|g| number(g.lis_field, g.label).owned_by(lis_band(g.category)))
            .collect(),
    ));
    sections.push(section(
        "warm",
        "Learners Head Counts",
        None,
        GRADES
            .iter()
            .map(|g| number(g.warm_field, g.label).owned_by(warm_band(g.category)))
            .collect(),
    ));
    sections.push(section(
        "subsidies",
        "Recipients of Government Subsidies",
        None,
        SUBSIDIES
            .iter()
            .flat_map(|s| {
                [
                    FieldDecl::new(s.offered, s.label, FieldKind::Choice(YES_NO_LOWER)),
                    number(s.count, "Number of recipients").gated_by(s.offered),
                ]
            })
            .collect(),
    ));
    sections.push(section(
        "teachers",
        "Total Number of Teachers",
        Some(TEACHERS_SECTION),
        PROGRAM_ROWS
            .iter()
            .flat_map(|row| {
                [
                    number(row.lpt, "With LPT").owned_by(teacher_row(row.category)),
                    number(row.non_lpt, "Non-Licensed").owned_by(teacher_row(row.category)),
                ]
            })
            .collect(),
    ));
    sections.push(section(
        "policies",
        "Policies and Learning Modalities",
        None,
        vec![
            FieldDecl::new(
                "childProtection",
                "Child Protection / Anti-Bullying Policy and Committee",
                FieldKind::Choice(YES_NO),
            ),
            checkbox("modalInPerson", "In-Person"),
            checkbox("modalBlended", "Blended Learning Modality"),
            checkbox("modalDistance", "Full Distance"),
            text("modalGradeLevels", "Grade Level/s Offered"),
            text("lmsUsed", "Learning Management System (LMS) Used"),
        ],
    ));
    sections.push(section(
        "curriculum",
        "Compliance to K to 12 Curriculum / Class Programs",
        Some(CURRICULUM_SECTION),
        PROGRAM_ROWS
            .iter()
            .map(|row| {
                FieldDecl::new(row.curriculum, row.label, FieldKind::Choice(YES_NO))
                    .owned_by(curriculum_field(row.category))
            })
            .collect(),
    ));
    sections.push(section(
        "facilityFigures",
        "School Facilities",
        None,
        vec![
            number("numInstructionalRooms", "No. of Instructional Rooms"),
            number("classroomSize", "Classroom Size in sqm (average)"),
            number("totalFloorArea", "Total Floor Area in square meter"),
            number("schoolLotArea", "School Lot Area in square meter"),
        ],
    ));
    sections.push(section(
        "physicalPlant",
        "Part 2: Physical Plant & Facilities",
        None,
        FACILITIES
            .iter()
            .flat_map(|f| {
                [
                    checkbox(f.evident, "Evident"),
                    checkbox(f.not_evident, "Not Evident"),
                    text(f.remarks, f.label),
                ]
            })
            .collect(),
    ));

    let mut labs = vec![
        checkbox("shsLabTVL", "TVL Track"),
        text("shsLabTVLDetails", "TVL lab (specify)"),
    ];
    labs.extend(SHS_LABS.iter().map(|(name, label)| checkbox(*name, *label)));
    labs.push(notes("shsLabRemarks", "Remarks"));
    sections.push(section(
        "shsLabs",
        "Other SHS Laboratories",
        Some(SHS_LABS_SECTION),
        labs,
    ));

    let mut findings = vec![notes("generalObservations", "Part 3: Other Findings")];
    for (index, (finding, status)) in FINDINGS.iter().enumerate() {
        let (finding_label, status_label) = match index {
            0 => ("Adverse/Significant Finding 1", "Status/Update 1"),
            1 => ("Adverse/Significant Finding 2", "Status/Update 2"),
            _ => ("Adverse/Significant Finding 3", "Status/Update 3"),
        };
        findings.push(notes(*finding, finding_label));
        findings.push(notes(*status, status_label));
    }
    sections.push(section("findings", "Findings", None, findings));

    sections.push(section(
        "signatures",
        "Monitoring Details",
        None,
        vec![
            date("monitorDate", "Date Inspected/Monitored"),
            text("monitorName", "Monitor (Printed Name)"),
            text("monitorPosition", "Position"),
            text("sdoOfficeUnit", "SDO Office/Unit"),
            text("schoolHeadName", "School Head (Printed Name)"),
            date("conformeDate", "Conforme Date"),
        ],
    ));

    FormSchema {
        sections,
        targets: targets(),
        groups: SUBSIDIES
            .iter()
            .map(|s| ChoiceGroup {
                field: s.offered,
                affirmative: SUBSIDY_AFFIRMATIVE,
            })
            .collect(),
        pairs: FACILITIES
            .iter()
            .map(|f| ExclusivePair::new(f.evident, f.not_evident))
            .collect(),
    }
}
