//! Renderer-facing proposal document. Everything is pre-formatted so the external PDF renderer
//! only lays text out.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::ProposalSubmission;
use crate::workflows::financing::amortization::{ANNUAL_RATE, MIN_DOWN_PAYMENT_PERCENTAGE};
use crate::workflows::financing::money::format_brl;

pub const DOCUMENT_TITLE: &str = "Real Estate Financing Proposal";
pub const DOCUMENT_ISSUER: &str = "SimulaFin - Financing Simulator";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentLine {
    pub label: String,
    pub value: String,
}

impl DocumentLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSection {
    pub name: String,
    pub national_id: String,
    pub email: String,
    pub proposal_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub image: String,
    pub signed_by: String,
    pub national_id: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProposalDocument {
    pub title: String,
    pub issuer: String,
    pub client: ClientSection,
    pub financing_details: Vec<DocumentLine>,
    pub highlights: Vec<DocumentLine>,
    pub conditions: Vec<String>,
    pub signature: SignatureBlock,
    pub file_name: String,
}

impl ProposalDocument {
    pub fn from_submission(submission: &ProposalSubmission) -> Self {
        let financing = &submission.financing;
        let signer = &submission.signer;
        let national_id = signer.user_cpf.formatted();
        let rate_percent = (ANNUAL_RATE * 100.0).round();

        let financing_details = vec![
            DocumentLine::new("Property value", financing.property_value.clone()),
            DocumentLine::new(
                format!("Down payment ({}%)", financing.down_payment_percentage),
                format_brl(financing.down_payment),
            ),
            DocumentLine::new("Financed amount", format_brl(financing.financed_amount)),
            DocumentLine::new(
                "Term",
                format!(
                    "{} years ({} installments)",
                    financing.term_years,
                    financing.installments()
                ),
            ),
            DocumentLine::new("Interest rate", format!("{rate_percent}% per year")),
            DocumentLine::new("System", "SAC (constant amortization)"),
        ];

        let highlights = vec![
            DocumentLine::new("First installment", format_brl(financing.monthly_payment)),
            DocumentLine::new("Total interest", format_brl(financing.total_interest)),
            DocumentLine::new("Total to pay", format_brl(financing.total_amount)),
        ];

        Self {
            title: DOCUMENT_TITLE.to_string(),
            issuer: DOCUMENT_ISSUER.to_string(),
            client: ClientSection {
                name: signer.user_name.clone(),
                national_id: national_id.clone(),
                email: submission.user_email.clone(),
                proposal_date: signer.signed_at.date_naive(),
            },
            financing_details,
            highlights,
            conditions: general_conditions(rate_percent),
            signature: SignatureBlock {
                image: signer.signature_data.clone(),
                signed_by: signer.user_name.clone(),
                national_id,
                signed_at: signer.signed_at,
            },
            file_name: file_name_for(&signer.user_name),
        }
    }
}

fn general_conditions(rate_percent: f64) -> Vec<String> {
    vec![
        "This proposal is valid for 30 days from its issue date.".to_string(),
        "Approval is subject to credit analysis and documentation review.".to_string(),
        "Installments decrease over the term under the SAC system.".to_string(),
        format!("Fixed interest rate of {rate_percent}% per year for the whole term."),
        format!(
            "Minimum down payment of {MIN_DOWN_PAYMENT_PERCENTAGE}% of the property value."
        ),
        "Housing insurance is mandatory and not included in this simulation.".to_string(),
        "Property documentation must be in good standing.".to_string(),
        "Proven income of at least 3x the first installment is required.".to_string(),
    ]
}

/// `financing-proposal-ana-souza.pdf`. The slug keeps alphanumerics only, joined by `-`.
pub fn file_name_for(signer_name: &str) -> String {
    let slug = signer_name
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if slug.is_empty() {
        return "financing-proposal.pdf".to_string();
    }
    format!("financing-proposal-{slug}.pdf")
}
