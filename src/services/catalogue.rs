//! Built-in catalogue data: the LVA list used for seeding and the admin
//! import, and the initial study categories, programs and updates.

/// Semester label attached to the seeded study updates.
pub const SEED_SEMESTER: &str = "Wintersemester 2025/26";

/// `(name, display_name, color, sort_order)`
pub const STUDY_CATEGORIES: &[(&str, &str, &str, i32)] = &[
    ("bachelor", "Bachelorstudiengänge", "blue", 1),
    ("master", "Masterstudiengänge", "gold", 2),
    ("mba", "MBA-Studiengänge (Executive)", "blue", 3),
    ("ulg", "Universitätslehrgänge (ULG)", "gold", 4),
];

/// Programs per category name, in display order.
pub const STUDY_PROGRAMS: &[(&str, &[&str])] = &[
    (
        "bachelor",
        &[
            "BSc. Wirtschaftswissenschaften",
            "BSc. Betriebswirtschaftslehre",
            "BSc. International Business Administration",
            "BSc. (CE) Finance, Banking und Digitalisierung",
        ],
    ),
    (
        "master",
        &[
            "MSc. Digital Business Management",
            "MSc. Economic and Business Analytics",
            "MSc. Economics",
            "MSc. Finance and Accounting",
            "MSc. Management",
            "MSc. General Management Double Degree ESC Troyes",
            "MSc. General Management Double Degree STUST Tainan",
            "MSc. Global Business Canada/Peru",
            "MSc. Global Business Kanada/Taiwan",
            "MSc. Global Business Russland/Italien",
            "MSc. Leadership and Innovation in Organizations",
        ],
    ),
    (
        "mba",
        &[
            "MBA Global Executive MBA",
            "MBA Executive MBA Management & Leadership",
            "MBA Management und Leadership für Frauen",
            "MBA Health Care Management",
        ],
    ),
    (
        "ulg",
        &[
            "ULG Versicherungswirtschaft",
            "ULG Tourismusmanagement",
            "ULG Applied Business Excellence",
        ],
    ),
];

/// Initial updates per program name, in display order.
pub const STUDY_UPDATES: &[(&str, &[&str])] = &[
    (
        "BSc. Wirtschaftswissenschaften",
        &[
            "Wissenschaftliches Arbeiten - neues Konzept: Seminar zur Bachelorarbeit ab 2025/26 nur noch 9 ECTS (statt 12). Neue LV: KS Wissenschaftliches Arbeiten fuer Wirtschaftswissenschaften: Methoden und Tools (3 ECTS).",
            "Das Modul Wissenschaftliches Arbeiten umfasst weiterhin 15 ECTS: KS Wissenschaftliches Arbeiten (3), KS Wissenschaftstheorie (3), SE Bachelorarbeit (9).",
            "Spezialisierungsfeld Economics & Psychology: Neue LVs in den Ergaenzungsfaechern Industrial Organization and Digital Economy, Public Finance, Public und Nonprofit Management, Sustainability Management.",
            "Spezialisierungsfeld Nachhaltige Team- und Personalentwicklung (WiPsy) wurde umfassend ueberarbeitet. Neue LVAs aus Soziologie, Wirtschaftspaedagogik und Soziale Kompetenz.",
            "Neues weiterfuehrendes Studium: Master Digital Society als direkt anschliessender Studiengang fuer WiWi-Bachelorabsolvent:innen anerkannt.",
        ],
    ),
    (
        "BSc. Betriebswirtschaftslehre",
        &[
            "Major Knowledge and Data in the Digital Enterprise wird ab WS 2025/26 nicht mehr angeboten.",
            "Einfuehrung in die Softwareentwicklung mit Python: Manuelle Zuteilung statt bisherigem Verfahren.",
            "Neue Voraussetzungen fuer IK Ethik und IK Gender und Diversity: 21 ECTS aus Core Business Knowledge + ein Fach aus Unternehmerisches Handeln.",
        ],
    ),
    (
        "BSc. International Business Administration",
        &[
            "Neues Pflichtmodul Mandatory Subject Elective Area: Business, Economics and Digitalization (24 ECTS) - erleichtert Anrechnung von Auslandssemester-LVAs.",
            "Anpassungen der ECTS bestehender Pflichtmodule: Int. Finance, Accounting and Taxation (24), Int. Management and Marketing (24), Digitalization and SCM (24), Economics (18).",
            "Anerkennung auf Fachebene statt LVA-Ebene moeglich. Free Electives (18 ECTS) bleiben unveraendert.",
        ],
    ),
    (
        "MSc. Digital Business Management",
        &[
            "Kooperationsstudium mit der FH Oberoesterreich - aktuelle Informationen direkt von der FH bereitgestellt.",
        ],
    ),
    (
        "MSc. Economic and Business Analytics",
        &[
            "Neue LVs: IK Data Science in Python for Economic and Business Analytics (3 ECTS), IK Algorithmics and Mathematics (3 ECTS).",
            "Neue Voraussetzung fuer SE Analytic Methods: KS Empirical Economics und IK Empirical Economics.",
        ],
    ),
    (
        "MSc. Economics",
        &[
            "Umbenennung: KS Labor Economics and Public Policy zu KS Labor Economics. ECTS und Inhalte bleiben unveraendert.",
        ],
    ),
    (
        "MSc. Finance and Accounting",
        &[
            "Keine Aenderungen.",
        ],
    ),
    (
        "MSc. Management",
        &[
            "Neue Competence Area: Sustainable Entrepreneurship & Circular Economy Innovation (SECEI). Empfehlung: Im 1. Semester mit KS Entrepreneurship beginnen.",
            "Neue Anerkennung: Selected Topics in Business Sciences (Master, Abroad) - 6 oder 12 ECTS im General Management Competence Elective.",
        ],
    ),
    (
        "MSc. General Management Double Degree ESC Troyes",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
    (
        "MSc. General Management Double Degree STUST Tainan",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
    (
        "MSc. Global Business Canada/Peru",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
    (
        "MSc. Global Business Kanada/Taiwan",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
    (
        "MSc. Global Business Russland/Italien",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
    (
        "MSc. Leadership and Innovation in Organizations",
        &[
            "Fuer dieses Studienprogramm wurden fuer dieses Semester keine Aenderungen beschlossen.",
        ],
    ),
];

/// Course catalogue of the business faculty.
pub const LVA_NAMES: &[&str] = &[
    "KS Buchhaltung nach UGB",
    "KS Bilanzierung nach UGB",
    "KS Finanzmanagement kompakt",
    "KS Steuern",
    "KS Grundlagen der Kostenrechnung",
    "KS Grundlagen des Kostenmanagements und der Budgetierung",
    "KS Einführung in Marketing",
    "KS Einführung in Strategie & Internationales Management",
    "KS Einführung in Organisation",
    "KS Einführung in Veränderungs- und Innovationsmanagement",
    "KS Grundlagen der Betriebswirtschaftslehre",
    "KS Grundlagen des integrierten Managements",
    "IK Integrative Fragestellungen aus Finance & Accounting",
    "IK Jahresabschlussanalyse",
    "IK Unternehmerisches Handeln - Management",
    "KS Grundlagen des Nachhaltigkeitsmanagement",
    "KS Grundlagen des Supply Chain Management",
    "IK Ethik",
    "IK Gender und Diversity",
    "VL Technische und methodische Grundlagen der Digitalisierung",
    "IK Technische und methodische Grundlagen der Digitalisierung",
    "VL Management der Digitalisierung und Einsatz betrieblicher Informationssysteme",
    "UE Management der Digitalisierung und Einsatz betrieblicher Informationssysteme",
    "VL Einführung in die Softwareentwicklung mit Python",
    "UE Einführung in die Softwareentwicklung mit Python",
    "KS Einführung in die Volkswirtschaftslehre",
    "KS Einführung in die Makroökonomie",
    "KS Einführung in die Mikroökonomie",
    "IK Einführung in die Mikroökonomie",
    "KS Mathematik für Sozial- und Wirtschaftswissenschaften",
    "KS Statistik für Sozial- und Wirtschaftswissenschaften",
    "KS Öffentliches Wirtschaftsrecht",
    "IK Öffentliches Wirtschaftsrecht",
    "KS Privates Wirtschaftsrecht",
    "IK Privates Wirtschaftsrecht",
    "KS Kommunikative Fertigkeiten Englisch (B2)",
    "KS Wirtschaftssprache I Englisch (B2+)",
    "KS Interkulturelle Fertigkeiten Englisch (C1)",
    "KS Wirtschaftssprache II Englisch (C1)",
    "KS Grundlagen der Wirtschaftsprüfung",
    "KS Internationale Rechnungslegung",
    "KS Einkommensteuer und Körperschaftsteuer",
    "KS Umsatzsteuer und Verkehrsteuern",
    "IK Gewinnermittlung",
    "IK Konzernrechnungslegung",
    "IK Tax Compliance",
    "SE Seminar Steuerlehre, Unternehmensrechnung und Wirtschaftsprüfung",
    "KS Grundlagen Operatives Controlling",
    "KS Operatives und strategisches Kostenmanagement",
    "KS Nachhaltigkeitscontrolling",
    "IK IT Systeme im Controlling",
    "IK Management Control Systems",
    "IK Strategisches Controlling",
    "SE Theorieseminar",
    "KS Unternehmensfinanzierung",
    "KS Wertpapiermanagement",
    "IK Grundzüge der Finanzwirtschaft",
    "IK Mergers & Acquisitions",
    "KS Investmentanalyse und Risikomanagement",
    "KS Real Estate Finance",
    "SE Finance - Wissenschaftliches Seminar",
    "KS Digital Business - Grundlagen",
    "IK Digital Business Planning",
    "VL Modell-basierte Entscheidungsunterstützung",
    "UE Modell-basierte Entscheidungsunterstützung",
    "KS Operations and Supply Chain Management",
    "IK Operations and Supply Chain Management",
    "KS Environmental and Quality Management",
    "KS Organizing Sustainability",
    "IK Transportation Logistics",
    "SE Software Tools for Decision Support in Transportation Logistics",
    "IK Introduction to Intelligent Solutions for Transportation and Physical Internet",
    "SE Traffic Simulation",
    "SE Research Seminar in Operations, Transport and Supply Chain Management",
    "UE Model-Based Decision Support",
    "KS Organization",
    "IK Organization",
    "KS Innovation and Entrepreneurship",
    "IK Innovation and Entrepreneurship",
    "SE Advanced Topics in Innovation and Entrepreneurship",
    "SE Advanced Topics in Organization and Innovation",
    "SE Entrepreneurial and Leadership Skills",
    "SE Research Seminar in Organization, Innovation and Entrepreneurship",
    "VL Datenmodellierung",
    "UE Datenmodellierung",
    "VL Prozess- und Kommunikationsmodellierung",
    "UE Prozess- und Kommunikationsmodellierung",
    "VL Informationsmanagement und strategische Projektsteuerung",
    "UE Informationsmanagement und strategische Projektsteuerung",
    "SE Seminar in Planung und Gestaltung der Digitalisierung",
    "KS Essentials of Leadership and Change",
    "IK Essentials of Leadership and Change",
    "KS Essentials of Strategic Management",
    "IK Essentials of Strategic Management",
    "SE Change",
    "SE Leadership",
    "SE Stakeholder Strategy",
    "SE Strategy Process",
    "SE Research Seminar Strategic Leadership",
    "KS Strategisches Management: Grundlagen",
    "IK Strategisches Management: Vertiefung",
    "KS Marktorientiertes Management: Grundlagen",
    "IK Marktorientiertes Management: Vertiefung",
    "SE Strategisches und Marktorientiertes Management in der Praxis",
    "SE Strategisches und Marktorientiertes Management: Forschung & Theorie",
    "KS Responsible Innovation",
    "SE Sustainable Business Practice",
    "KS Socio-Technical Transition Management",
    "SE Sustainable Management Accounting",
    "SE Research Seminar Sustainability",
    "IK Digital Business Anwendungen",
    "SE Seminar Digital Business",
    "KS International Business",
    "IK International Market Entry",
    "SE Cross Cultural Management",
    "IK Special Topics in International Management",
    "KS Grundkurs Public und Nonprofit Management",
    "SE Seminar aus Public und Nonprofit Management 1",
    "SE Seminar aus Public und Nonprofit Management 2",
];

#[cfg(test)]
#[path = "catalogue_test.rs"]
mod tests;
