//! Built-in reference data
//!
//! The ISO standards tracked by the dashboard, the static product
//! catalog with its processes and audit observations, and the QMS
//! documentation library.

use crate::models::{
    ClauseSeed, Document, DocumentKind, Observation, ObservationStatus, Process, Product,
    StandardSeed,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;

/// Product catalog, built once on first use
pub static PRODUCT_CATALOG: Lazy<Vec<Product>> = Lazy::new(build_catalog);

/// Look up a catalog product by id
pub fn find_product(id: i32) -> Option<&'static Product> {
    PRODUCT_CATALOG.iter().find(|p| p.id == id)
}

/// Controlled QMS documents, built once on first use
pub static DOCUMENT_LIBRARY: Lazy<Vec<Document>> = Lazy::new(build_documents);

pub fn find_document(id: i32) -> Option<&'static Document> {
    DOCUMENT_LIBRARY.iter().find(|d| d.id == id)
}

/// Standards and clauses seeded into an empty record store
pub fn iso_standards() -> Vec<StandardSeed> {
    vec![
        StandardSeed {
            name: "ISO 9001:2015",
            description: "Quality management systems - Requirements",
            clauses: vec![
                ClauseSeed {
                    clause_number: "4.1",
                    title: "Understanding the organization and its context",
                    description: "Determine external and internal issues relevant to the QMS.",
                    compliance_steps: vec![
                        "Identify internal and external issues",
                        "Document the issues in the context analysis",
                        "Review the context analysis at management review",
                    ],
                },
                ClauseSeed {
                    clause_number: "4.2",
                    title: "Understanding the needs and expectations of interested parties",
                    description: "Determine interested parties and their relevant requirements.",
                    compliance_steps: vec![
                        "List relevant interested parties",
                        "Record the requirements of each party",
                        "Monitor and review party information",
                    ],
                },
                ClauseSeed {
                    clause_number: "4.4",
                    title: "Quality management system and its processes",
                    description: "Establish, implement, maintain and improve the QMS processes.",
                    compliance_steps: vec![
                        "Map process inputs, outputs and interactions",
                        "Assign process owners",
                        "Define process performance indicators",
                        "Maintain documented information for each process",
                    ],
                },
                ClauseSeed {
                    clause_number: "7.5",
                    title: "Documented information",
                    description: "Create, update and control documented information.",
                    compliance_steps: vec![
                        "Apply identification and format rules to documents",
                        "Review and approve documents before release",
                        "Control distribution, retention and disposition",
                    ],
                },
                ClauseSeed {
                    clause_number: "9.2",
                    title: "Internal audit",
                    description: "Conduct internal audits at planned intervals.",
                    compliance_steps: vec![
                        "Plan the audit programme",
                        "Define audit criteria and scope",
                        "Select objective auditors",
                        "Report results to management",
                    ],
                },
            ],
        },
        StandardSeed {
            name: "ISO/IEC 12207:2017",
            description: "Systems and software engineering - Software life cycle processes",
            clauses: vec![
                ClauseSeed {
                    clause_number: "6.3.1",
                    title: "Project planning process",
                    description: "Produce and coordinate effective and workable plans.",
                    compliance_steps: vec![
                        "Define project objectives and constraints",
                        "Define the project life cycle model",
                        "Estimate effort, cost and schedule",
                    ],
                },
                ClauseSeed {
                    clause_number: "6.3.5",
                    title: "Configuration management process",
                    description: "Manage and control system elements and configurations.",
                    compliance_steps: vec![
                        "Identify configuration items",
                        "Establish baselines",
                        "Control changes to baselines",
                        "Record configuration status",
                    ],
                },
                ClauseSeed {
                    clause_number: "6.4.9",
                    title: "Verification process",
                    description: "Provide objective evidence that requirements are fulfilled.",
                    compliance_steps: vec![
                        "Prepare the verification strategy",
                        "Perform verification",
                        "Manage verification results",
                    ],
                },
            ],
        },
        StandardSeed {
            name: "ISO/IEC 27701:2019",
            description: "Privacy information management - Extension to ISO/IEC 27001 and 27002",
            clauses: vec![
                ClauseSeed {
                    clause_number: "5.2.1",
                    title: "Understanding the organization and its context",
                    description: "Determine the organization's role as PII controller and/or processor.",
                    compliance_steps: vec![
                        "Determine PII controller and processor roles",
                        "Identify applicable privacy legislation",
                    ],
                },
                ClauseSeed {
                    clause_number: "7.2.8",
                    title: "Records related to processing PII",
                    description: "Maintain records supporting PII processing obligations.",
                    compliance_steps: vec![
                        "Maintain the record of processing activities",
                        "Review retention periods",
                        "Protect processing records",
                    ],
                },
                ClauseSeed {
                    clause_number: "7.3.9",
                    title: "PII de-identification and deletion",
                    description: "Delete or de-identify PII once it is no longer needed.",
                    compliance_steps: vec![
                        "Define deletion criteria",
                        "Implement deletion mechanisms",
                        "Verify deletion in backups",
                    ],
                },
            ],
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn observation(
    id: i32,
    description: &str,
    audit_date: NaiveDate,
    status: ObservationStatus,
    compliance: u8,
) -> Observation {
    Observation {
        id,
        description: description.to_string(),
        audit_date,
        status,
        compliance,
    }
}

fn process(id: i32, name: &str, observations: Vec<Observation>) -> Process {
    Process {
        id,
        name: name.to_string(),
        observations,
    }
}

fn build_catalog() -> Vec<Product> {
    use ObservationStatus::{Completed, Pending};

    let crm_audit = date(2024, 2, 15);
    let assets_audit = date(2024, 2, 20);
    let docs_audit = date(2024, 2, 10);

    vec![
        Product {
            id: 1,
            name: "CRM System".to_string(),
            processes: vec![
                process(
                    1,
                    "Customer Registration",
                    vec![
                        observation(1, "Duplicate email addresses are not validated", crm_audit, Completed, 90),
                        observation(2, "Change history is not recorded", crm_audit, Pending, 60),
                    ],
                ),
                process(
                    2,
                    "Opportunity Management",
                    vec![observation(3, "Follow-up process is not documented", crm_audit, Pending, 70)],
                ),
            ],
        },
        Product {
            id: 2,
            name: "Asset Management System".to_string(),
            processes: vec![
                process(
                    3,
                    "Asset Registration",
                    vec![observation(4, "Automatic categorization is missing", assets_audit, Completed, 95)],
                ),
                process(
                    4,
                    "Preventive Maintenance",
                    vec![observation(5, "Alerts are not configured", assets_audit, Pending, 80)],
                ),
            ],
        },
        Product {
            id: 3,
            name: "Document Management AI".to_string(),
            processes: vec![
                process(
                    5,
                    "Document Classification",
                    vec![observation(6, "Model precision is below 90%", docs_audit, Pending, 75)],
                ),
                process(
                    6,
                    "Data Extraction",
                    vec![observation(7, "Scanned documents are not processed", docs_audit, Pending, 65)],
                ),
            ],
        },
    ]
}

fn build_documents() -> Vec<Document> {
    vec![
        Document {
            id: 1,
            title: "Document Control Procedure".to_string(),
            kind: DocumentKind::Procedure,
            content: "# Document Control
## 1. Purpose
Set the guidelines for controlling the documents of the Quality Management System.

## 2. Scope
Applies to every document of the Quality Management System.

## 3. Responsibilities
- Quality Management
- Process Leads
- All staff"
                .to_string(),
            last_updated: date(2024, 3, 1),
        },
        Document {
            id: 2,
            title: "Quality Policy".to_string(),
            kind: DocumentKind::Policy,
            content: "# Quality Policy
PI-TEC commits to:
- Meet the needs of our customers
- Continually improve our processes
- Comply with legal and regulatory requirements"
                .to_string(),
            last_updated: date(2024, 2, 28),
        },
    ]
}
