use crate::infra::{
    InMemorySimulationRepository, InMemorySubmissionRepository, InMemoryUserDirectory,
};
use chrono::Utc;
use clap::Args;
use simulafin::error::AppError;
use simulafin::workflows::financing::proposals::{
    AdminReviewWorkflow, ProposalDocument, ProposalDraft, SignatureCapture, StatusFilter,
    SubmissionFilter, SubmissionStatus, TransitionPolicy,
};
use simulafin::workflows::financing::simulations::{SimulationRequest, SimulationService};
use simulafin::workflows::financing::{
    format_brl, AuthenticatedUser, FinancingSummary, SimulationInput, UserId, UserProfile,
};
use std::sync::Arc;

const DEMO_SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB";

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Property value as typed in the form, e.g. "R$ 500.000" or "320000,50"
    #[arg(long)]
    pub(crate) property_value: String,
    /// Down payment percentage (20 to 90)
    #[arg(long, default_value_t = 20.0)]
    pub(crate) down_payment: f64,
    /// Loan term in years (1 to 35)
    #[arg(long, default_value_t = 30)]
    pub(crate) term_years: u32,
    /// Print every monthly installment
    #[arg(long)]
    pub(crate) schedule: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Property value used by the demo client
    #[arg(long, default_value = "R$ 500.000")]
    pub(crate) property_value: String,
    /// Down payment percentage used by the demo client
    #[arg(long, default_value_t = 20.0)]
    pub(crate) down_payment: f64,
    /// Loan term in years used by the demo client
    #[arg(long, default_value_t = 30)]
    pub(crate) term_years: u32,
    /// Only allow pending -> review -> approved/rejected transitions
    #[arg(long)]
    pub(crate) forward_only: bool,
}

pub(crate) fn run_simulation(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        property_value,
        down_payment,
        term_years,
        schedule,
    } = args;

    let input = SimulationInput::parse(&property_value, down_payment, term_years)?;
    let result = input.compute()?;
    render_summary(&FinancingSummary::new(&input, &result));

    if schedule {
        println!(
            "\n{:>5}  {:>16}  {:>16}  {:>16}  {:>18}",
            "month", "amortization", "interest", "payment", "balance"
        );
        for installment in input.schedule()? {
            println!(
                "{:>5}  {:>16}  {:>16}  {:>16}  {:>18}",
                installment.month,
                format_brl(installment.amortization),
                format_brl(installment.interest),
                format_brl(installment.payment),
                format_brl(installment.remaining_balance),
            );
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        property_value,
        down_payment,
        term_years,
        forward_only,
    } = args;

    let client = AuthenticatedUser {
        id: UserId("demo-client".to_string()),
        email: "ana.souza@example.com".to_string(),
    };
    let admin = AuthenticatedUser {
        id: UserId("demo-admin".to_string()),
        email: "analyst@simulafin.example".to_string(),
    };

    let users = InMemoryUserDirectory::with_admins(&[admin.id.clone()]);
    users.register(UserProfile {
        id: client.id.clone(),
        email: client.email.clone(),
        name: "Ana Souza".to_string(),
        is_admin: false,
        created_at: Utc::now(),
    });

    let policy = if forward_only {
        TransitionPolicy::ForwardOnly
    } else {
        TransitionPolicy::Permissive
    };
    let simulations = SimulationService::new(Arc::new(InMemorySimulationRepository::default()));
    let review = AdminReviewWorkflow::with_policy(
        Arc::new(InMemorySubmissionRepository::default()),
        Arc::new(users),
        policy,
    );

    println!("SimulaFin demo");
    let request = SimulationRequest {
        property_value,
        down_payment_percentage: down_payment,
        term_years,
    };
    let saved = simulations.record(Some(&client), &request)?;
    println!("\nSaved simulation {} for {}", saved.id.0, saved.user_email);
    render_summary(&saved.financing);

    let draft = ProposalDraft {
        simulation: request,
        signature: SignatureCapture {
            name: "Ana Souza".to_string(),
            national_id: "123.456.789-01".to_string(),
            signature_image: DEMO_SIGNATURE.to_string(),
        },
    };
    let submission_id = review.create_submission(Some(&client), draft)?;
    println!("\nProposal {} submitted (pending)", submission_id.0);

    let admin_actor = review.actor_for(&admin);
    let pending = review.list_submissions(
        &admin_actor,
        SubmissionFilter::new(None, StatusFilter::Only(SubmissionStatus::Pending)),
    )?;
    println!(
        "Admin queue: {} pending of {} submissions",
        pending.matched(),
        pending.total()
    );

    for next in ["review", "approved"] {
        let updated = review.update_status(&admin_actor, &submission_id, next)?;
        println!("  {} -> {}", updated.id.0, updated.status.label());
    }

    let summary = review.status_summary(&admin_actor)?;
    println!(
        "Status summary: total {} | pending {} | review {} | approved {} | rejected {}",
        summary.total, summary.pending, summary.review, summary.approved, summary.rejected
    );

    let client_actor = review.actor_for(&client);
    let document = review.proposal_document(&client_actor, &submission_id)?;
    render_document(&document);

    Ok(())
}

fn render_summary(summary: &FinancingSummary) {
    println!("Property value:   {}", summary.property_value);
    println!(
        "Down payment:     {} ({}%)",
        format_brl(summary.down_payment),
        summary.down_payment_percentage
    );
    println!("Financed amount:  {}", format_brl(summary.financed_amount));
    println!(
        "Term:             {} years ({} installments)",
        summary.term_years,
        summary.installments()
    );
    println!("First payment:    {}", format_brl(summary.monthly_payment));
    println!("Total interest:   {}", format_brl(summary.total_interest));
    println!("Total to pay:     {}", format_brl(summary.total_amount));
}

fn render_document(document: &ProposalDocument) {
    println!("\n{} ({})", document.title, document.file_name);
    println!("{}", document.issuer);
    println!(
        "Client: {} | {} | {} | {}",
        document.client.name,
        document.client.national_id,
        document.client.email,
        document.client.proposal_date
    );
    for line in document.financing_details.iter().chain(&document.highlights) {
        println!("  {}: {}", line.label, line.value);
    }
    println!("General conditions:");
    for (index, condition) in document.conditions.iter().enumerate() {
        println!("  {}. {}", index + 1, condition);
    }
    println!(
        "Signed by {} ({}) at {}",
        document.signature.signed_by,
        document.signature.national_id,
        document.signature.signed_at.format("%Y-%m-%d %H:%M UTC")
    );
}
