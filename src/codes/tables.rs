//! Fixed IRS Exempt Organizations code tables.
//!
//! Each table maps the raw code found in the Business Master File extract to a
//! human-readable label. Tables are compiled in and never change at runtime.

use serde::Serialize;

/// One of the fixed code categories in the extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeTable {
    Subsection,
    Affiliation,
    Organization,
    Foundation,
    Deductibility,
    Status,
    FilingRequirement,
    PfFilingRequirement,
    Asset,
    Income,
}

impl CodeTable {
    pub const ALL: [CodeTable; 10] = [
        CodeTable::Subsection,
        CodeTable::Affiliation,
        CodeTable::Organization,
        CodeTable::Foundation,
        CodeTable::Deductibility,
        CodeTable::Status,
        CodeTable::FilingRequirement,
        CodeTable::PfFilingRequirement,
        CodeTable::Asset,
        CodeTable::Income,
    ];

    /// Column in the raw extract that carries this table's code.
    pub fn raw_field(&self) -> &'static str {
        match self {
            CodeTable::Subsection => "SUBSECTION",
            CodeTable::Affiliation => "AFFILIATION",
            CodeTable::Organization => "ORGANIZATION",
            CodeTable::Foundation => "FOUNDATION",
            CodeTable::Deductibility => "DEDUCTIBILITY",
            CodeTable::Status => "STATUS",
            CodeTable::FilingRequirement => "FILING_REQ_CD",
            CodeTable::PfFilingRequirement => "PF_FILING_REQ_CD",
            CodeTable::Asset => "ASSET_CD",
            CodeTable::Income => "INCOME_CD",
        }
    }

    /// Key used for this table's label in enriched documents.
    pub fn label_key(&self) -> &'static str {
        match self {
            CodeTable::Subsection => "subsection",
            CodeTable::Affiliation => "affiliation",
            CodeTable::Organization => "organization",
            CodeTable::Foundation => "foundation",
            CodeTable::Deductibility => "deductibility",
            CodeTable::Status => "status",
            CodeTable::FilingRequirement => "filing_requirement",
            CodeTable::PfFilingRequirement => "pf_filing_requirement",
            CodeTable::Asset => "asset_range",
            CodeTable::Income => "income_range",
        }
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            CodeTable::Subsection => SUBSECTION,
            CodeTable::Affiliation => AFFILIATION,
            CodeTable::Organization => ORGANIZATION,
            CodeTable::Foundation => FOUNDATION,
            CodeTable::Deductibility => DEDUCTIBILITY,
            CodeTable::Status => STATUS,
            CodeTable::FilingRequirement => FILING_REQUIREMENT,
            CodeTable::PfFilingRequirement => PF_FILING_REQUIREMENT,
            CodeTable::Asset => MONEY_RANGE,
            CodeTable::Income => MONEY_RANGE,
        }
    }

    /// Label for `code`, or `None` when the table has no such entry.
    pub fn label(&self, code: &str) -> Option<&'static str> {
        let code = code.trim();
        self.entries()
            .iter()
            .find(|(key, _)| *key == code)
            .map(|(_, label)| *label)
    }
}

/// Look up a code, returning the code itself when the table does not know it.
pub fn lookup(table: CodeTable, code: &str) -> String {
    match table.label(code) {
        Some(label) => label.to_string(),
        None => code.to_string(),
    }
}

const SUBSECTION: &[(&str, &str)] = &[
    ("01", "501(c)(1) - Corporations Organized Under Act of Congress"),
    ("02", "501(c)(2) - Title Holding Corporations"),
    ("03", "501(c)(3) - Charitable, Educational, Religious, Scientific"),
    ("04", "501(c)(4) - Social Welfare Organizations"),
    ("05", "501(c)(5) - Labor, Agricultural, Horticultural Orgs"),
    ("06", "501(c)(6) - Business Leagues, Chambers of Commerce"),
    ("07", "501(c)(7) - Social and Recreational Clubs"),
    ("08", "501(c)(8) - Fraternal Beneficiary Societies"),
    ("09", "501(c)(9) - Voluntary Employees Beneficiary Associations"),
    ("10", "501(c)(10) - Domestic Fraternal Societies"),
    ("11", "501(c)(11) - Teachers’ Retirement Fund Associations"),
    ("12", "501(c)(12) - Benevolent Life Insurance Associations"),
    ("13", "501(c)(13) - Cemetery Companies"),
    ("14", "501(c)(14) - Credit Unions, Other Mutual Financial Orgs"),
    ("15", "501(c)(15) - Mutual Insurance Companies"),
    ("16", "501(c)(16) - Crop Financing Corporations"),
    ("17", "501(c)(17) - Supplemental Unemployment Benefit Trusts"),
    ("18", "501(c)(18) - Employee Funded Pension Trust"),
    ("19", "501(c)(19) - Veterans’ Organizations"),
    ("20", "501(c)(20) - Legal Service Plans"),
    ("21", "501(c)(21) - Black Lung Benefit Trusts"),
    ("22", "501(c)(22) - Withdrawal Liability Payment Fund"),
    ("23", "501(c)(23) - Veterans’ Associations (est. before 1880)"),
    ("24", "501(c)(24) - ERISA Trusts"),
    ("25", "501(c)(25) - Title Holding Corp. for Pensions"),
    ("26", "501(c)(26) - State-Sponsored Health Coverage Orgs"),
    ("27", "501(c)(27) - Workers’ Compensation Reinsurance Orgs"),
    ("28", "501(c)(28) - National Railroad Retirement Investment Trust"),
    ("29", "501(c)(29) - CO-OP Health Insurance Issuers"),
    ("40", "501(d) - Apostolic and Religious Orgs"),
    ("50", "501(e) - Cooperative Hospital Service Orgs"),
    ("60", "501(f) - Cooperative Service Orgs of Educational Institutions"),
    ("70", "501(k) - Child Care Organizations"),
    ("80", "501(n) - Charitable Risk Pools"),
    ("90", "4947(a)(1) - Nonexempt Charitable Trusts"),
    ("91", "4947(a)(2) - Split-Interest Trusts"),
    ("92", "527 - Political Organizations"),
];

const AFFILIATION: &[(&str, &str)] = &[
    ("1", "Central"),
    ("2", "Intermediate"),
    ("3", "Independent"),
    ("6", "Central organization"),
    ("9", "Subordinate"),
];

const ORGANIZATION: &[(&str, &str)] = &[
    ("1", "Corporation"),
    ("2", "Trust"),
    ("3", "Association"),
    ("4", "Other"),
];

const FOUNDATION: &[(&str, &str)] = &[
    ("00", "All organizations except 501(c)(3)"),
    ("02", "Private Operating Foundation"),
    ("03", "Private Non-Operating Foundation"),
    ("09", "Suspense"),
    ("10", "Church"),
    ("11", "School"),
    ("12", "Hospital or Medical Research"),
    ("13", "Governmental Unit"),
    ("14", "Publicly Supported Organization (170(b)(1)(A)(vi))"),
    ("15", "Organization Supporting Multiple Orgs"),
    ("16", "Community Trust"),
    ("17", "Publicly Supported Org (170(b)(1)(A)(ii))"),
    ("18", "Publicly Supported Org (170(b)(1)(A)(iii))"),
];

const DEDUCTIBILITY: &[(&str, &str)] = &[
    ("1", "Contributions are deductible"),
    ("2", "Contributions not deductible"),
    ("4", "Deductible by treaty"),
    ("5", "Contributions deductible by special rule"),
    ("6", "Deductible for estate/gift, not income tax"),
    ("7", "Contributions limited"),
];

const STATUS: &[(&str, &str)] = &[
    ("01", "Unconditional Exemption"),
    ("02", "Conditional Exemption"),
    ("12", "Terminated"),
    ("25", "Inactive"),
    ("40", "Revoked"),
    ("41", "Merger"),
    ("42", "Consolidation"),
    ("43", "Fully liquidated"),
    ("44", "Terminated"),
    ("46", "Inactive (other)"),
];

const FILING_REQUIREMENT: &[(&str, &str)] = &[
    ("00", "None"),
    ("01", "Form 990"),
    ("02", "Form 990-EZ"),
    ("03", "Form 990-PF"),
    ("04", "Form 990-T"),
    ("06", "Form 990-BL"),
];

const PF_FILING_REQUIREMENT: &[(&str, &str)] = &[
    ("0", "No PF return"),
    ("1", "Form 990-PF required"),
    ("2", "Form 990-PF not required"),
];

// ASSET_CD and INCOME_CD share the same dollar brackets.
const MONEY_RANGE: &[(&str, &str)] = &[
    ("0", "0"),
    ("1", "1 - 9,999"),
    ("2", "10,000 - 24,999"),
    ("3", "25,000 - 99,999"),
    ("4", "100,000 - 499,999"),
    ("5", "500,000 - 999,999"),
    ("6", "1,000,000 - 4,999,999"),
    ("7", "5,000,000 - 9,999,999"),
    ("8", "10,000,000 - 49,999,999"),
    ("9", "50,000,000+"),
];
