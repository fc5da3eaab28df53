use super::common::*;
use std::sync::Arc;

use crate::workflows::financing::amortization::AmortizationError;
use crate::workflows::financing::identity::{Actor, UserId};
use crate::workflows::financing::proposals::domain::{
    SignatureError, StatusSummary, SubmissionId, SubmissionStatus, TransitionPolicy,
};
use crate::workflows::financing::proposals::filter::{StatusFilter, SubmissionFilter};
use crate::workflows::financing::proposals::repository::SubmissionRepository;
use crate::workflows::financing::proposals::{AdminReviewWorkflow, ReviewError};
use crate::workflows::financing::repository::RepositoryError;

#[test]
fn create_submission_starts_pending_with_recomputed_figures() {
    let (workflow, submissions) = build_workflow();

    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");
    let stored = submissions.stored(&id);

    assert_eq!(stored.status, SubmissionStatus::Pending);
    assert_eq!(stored.user_id, ana().id);
    assert_eq!(stored.user_email, "ana.souza@example.com");
    assert_eq!(stored.signer.user_name, "Ana Souza");
    assert_eq!(stored.signer.user_cpf.as_str(), "12345678901");
    assert_eq!(stored.signer.signature_data, SIGNATURE_PNG);
    assert_eq!(stored.financing.property_value, "R$ 500.000");
    assert_eq!(stored.financing.down_payment, 100_000.0);
    assert_eq!(stored.financing.financed_amount, 400_000.0);
    assert!((stored.financing.monthly_payment - 5_111.11).abs() < 0.01);
    assert!((stored.financing.total_interest - 722_000.0).abs() < 1e-3);
    assert_eq!(stored.signer.signed_at, stored.created_at);
}

#[test]
fn create_submission_requires_authentication() {
    let (workflow, submissions) = build_workflow();

    assert!(matches!(
        workflow.create_submission(None, draft()),
        Err(ReviewError::NotAuthenticated)
    ));
    assert!(submissions.list().expect("list").is_empty());
}

#[test]
fn create_submission_validates_signer() {
    let (workflow, submissions) = build_workflow();

    let mut short_id = draft();
    short_id.signature.national_id = "123.456.789-0".to_string();
    assert!(matches!(
        workflow.create_submission(Some(&ana()), short_id),
        Err(ReviewError::InvalidSignature(
            SignatureError::InvalidNationalId { digits: 10 }
        ))
    ));

    let mut unnamed = draft();
    unnamed.signature.name = "   ".to_string();
    assert!(matches!(
        workflow.create_submission(Some(&ana()), unnamed),
        Err(ReviewError::InvalidSignature(SignatureError::MissingName))
    ));

    let mut unsigned = draft();
    unsigned.signature.signature_image.clear();
    assert!(matches!(
        workflow.create_submission(Some(&ana()), unsigned),
        Err(ReviewError::InvalidSignature(SignatureError::MissingSignature))
    ));

    assert!(submissions.list().expect("list").is_empty());
}

#[test]
fn create_submission_rejects_low_down_payment_before_storage() {
    let workflow = AdminReviewWorkflow::new(
        Arc::new(OfflineSubmissions),
        Arc::new(MemoryUsers::with_defaults()),
    );
    let mut low = draft();
    low.simulation.down_payment_percentage = 19.0;

    assert!(matches!(
        workflow.create_submission(Some(&ana()), low),
        Err(ReviewError::InvalidInput(
            AmortizationError::DownPaymentBelowMinimum(_)
        ))
    ));
}

#[test]
fn create_submission_surfaces_storage_failures() {
    let workflow = AdminReviewWorkflow::new(
        Arc::new(OfflineSubmissions),
        Arc::new(MemoryUsers::with_defaults()),
    );

    assert!(matches!(
        workflow.create_submission(Some(&ana()), draft()),
        Err(ReviewError::Persistence(RepositoryError::Unavailable(_)))
    ));
}

#[test]
fn check_is_admin_reads_the_directory_flag() {
    let (workflow, _) = build_workflow();

    assert!(workflow.check_is_admin(&carla_admin().id));
    assert!(!workflow.check_is_admin(&ana().id));
    assert!(!workflow.check_is_admin(&UserId("ghost".to_string())));
    assert!(workflow.actor_for(&carla_admin()).is_admin);
    assert!(!workflow.actor_for(&bruno()).is_admin);
}

#[test]
fn check_is_admin_fails_closed_on_lookup_error() {
    let workflow = AdminReviewWorkflow::new(
        Arc::new(MemorySubmissions::default()),
        Arc::new(UnreachableUsers),
    );

    assert!(!workflow.check_is_admin(&carla_admin().id));
    let actor = workflow.actor_for(&carla_admin());
    assert!(matches!(
        workflow.list_submissions(&actor, SubmissionFilter::all()),
        Err(ReviewError::Unauthorized)
    ));
}

#[test]
fn non_admin_cannot_change_status() {
    let (workflow, submissions) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");

    for status in ["approved", "rejected", "bogus"] {
        assert!(matches!(
            workflow.update_status(&Actor::user(&ana()), &id, status),
            Err(ReviewError::Unauthorized)
        ));
    }
    assert!(matches!(
        workflow.set_status(&Actor::user(&bruno()), &id, SubmissionStatus::Approved),
        Err(ReviewError::Unauthorized)
    ));
    assert_eq!(submissions.stored(&id).status, SubmissionStatus::Pending);
}

#[test]
fn admin_approval_only_changes_status() {
    let (workflow, submissions) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");
    let before = submissions.stored(&id);

    let updated = workflow
        .update_status(&admin_actor(), &id, "approved")
        .expect("admin approves");

    assert_eq!(updated.status, SubmissionStatus::Approved);
    let mut expected = before;
    expected.status = SubmissionStatus::Approved;
    assert_eq!(updated, expected);
    assert_eq!(submissions.stored(&id), expected);
}

#[test]
fn unknown_status_strings_are_rejected() {
    let (workflow, submissions) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");

    match workflow.update_status(&admin_actor(), &id, "archived") {
        Err(ReviewError::InvalidStatus(unknown)) => assert_eq!(unknown.0, "archived"),
        other => panic!("expected invalid status, got {other:?}"),
    }
    assert_eq!(submissions.stored(&id).status, SubmissionStatus::Pending);

    let updated = workflow
        .update_status(&admin_actor(), &id, " Review ")
        .expect("normalized status accepted");
    assert_eq!(updated.status, SubmissionStatus::Review);
}

#[test]
fn updating_missing_submission_is_not_found() {
    let (workflow, _) = build_workflow();
    assert!(matches!(
        workflow.update_status(
            &admin_actor(),
            &SubmissionId("sub-missing".to_string()),
            "approved"
        ),
        Err(ReviewError::NotFound)
    ));
}

#[test]
fn permissive_policy_lets_admins_reopen_decisions() {
    let (workflow, _) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");

    workflow
        .set_status(&admin_actor(), &id, SubmissionStatus::Rejected)
        .expect("reject");
    let reopened = workflow
        .set_status(&admin_actor(), &id, SubmissionStatus::Pending)
        .expect("permissive reopen");
    assert_eq!(reopened.status, SubmissionStatus::Pending);
}

#[test]
fn forward_only_policy_guards_the_lifecycle() {
    let (workflow, submissions) = build_workflow_with(TransitionPolicy::ForwardOnly);
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");

    workflow
        .set_status(&admin_actor(), &id, SubmissionStatus::Review)
        .expect("pending -> review");
    assert!(matches!(
        workflow.set_status(&admin_actor(), &id, SubmissionStatus::Pending),
        Err(ReviewError::TransitionRejected {
            from: SubmissionStatus::Review,
            to: SubmissionStatus::Pending
        })
    ));
    workflow
        .set_status(&admin_actor(), &id, SubmissionStatus::Rejected)
        .expect("review -> rejected");
    assert!(matches!(
        workflow.set_status(&admin_actor(), &id, SubmissionStatus::Approved),
        Err(ReviewError::TransitionRejected { .. })
    ));
    assert_eq!(submissions.stored(&id).status, SubmissionStatus::Rejected);

    let direct = workflow
        .create_submission(Some(&bruno()), draft())
        .expect("submission stored");
    workflow
        .set_status(&admin_actor(), &direct, SubmissionStatus::Approved)
        .expect("pending -> approved");
}

#[test]
fn listing_requires_admin() {
    let (workflow, _) = build_workflow();
    workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");

    assert!(matches!(
        workflow.list_submissions(&Actor::user(&ana()), SubmissionFilter::all()),
        Err(ReviewError::Unauthorized)
    ));
    assert!(matches!(
        workflow.status_summary(&Actor::user(&ana())),
        Err(ReviewError::Unauthorized)
    ));
}

#[test]
fn listing_twice_without_writes_is_identical() {
    let (workflow, _) = build_workflow();
    for user in [ana(), bruno(), ana()] {
        workflow
            .create_submission(Some(&user), draft())
            .expect("submission stored");
    }

    let first = workflow
        .list_submissions(&admin_actor(), SubmissionFilter::all())
        .expect("first listing");
    let second = workflow
        .list_submissions(&admin_actor(), SubmissionFilter::all())
        .expect("second listing");

    let first_ids: Vec<_> = first.iter().map(|s| s.id.clone()).collect();
    let second_ids: Vec<_> = second.iter().map(|s| s.id.clone()).collect();
    assert_eq!(first_ids.len(), 3);
    assert_eq!(first_ids, second_ids);

    // Restartable: a second pass over the same listing replays it.
    let replay: Vec<_> = first.iter().map(|s| s.id.clone()).collect();
    assert_eq!(first_ids, replay);
}

#[test]
fn listing_is_newest_first() {
    let (workflow, _) = build_workflow();
    let older = workflow
        .create_submission(Some(&ana()), draft())
        .expect("submission stored");
    let newer = workflow
        .create_submission(Some(&bruno()), draft())
        .expect("submission stored");

    let listing = workflow
        .list_submissions(&admin_actor(), SubmissionFilter::all())
        .expect("listing");
    let ids: Vec<_> = listing.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![newer, older]);
}

#[test]
fn search_matches_name_email_national_id_and_property_value() {
    let (workflow, _) = build_workflow();
    workflow
        .create_submission(
            Some(&ana()),
            draft_for("Ana Souza", "111.222.333-44", "R$ 500.000"),
        )
        .expect("stored");
    workflow
        .create_submission(
            Some(&bruno()),
            draft_for("Bruno Lima", "555.666.777-88", "R$ 275.000"),
        )
        .expect("stored");

    let names = |term: &str| -> Vec<String> {
        let filter = SubmissionFilter::new(Some(term), StatusFilter::All);
        workflow
            .list_submissions(&admin_actor(), filter)
            .expect("listing")
            .into_matches()
            .into_iter()
            .map(|s| s.signer.user_name)
            .collect()
    };

    assert_eq!(names("SOUZA"), vec!["Ana Souza"]);
    assert_eq!(names("bruno@EXAMPLE"), vec!["Bruno Lima"]);
    assert_eq!(names("5556667"), vec!["Bruno Lima"]);
    assert_eq!(names("500.000"), vec!["Ana Souza"]);
    assert_eq!(names("   ").len(), 2);
    assert!(names("zzz").is_empty());
}

#[test]
fn status_filter_and_summary() {
    let (workflow, _) = build_workflow();
    let first = workflow
        .create_submission(Some(&ana()), draft())
        .expect("stored");
    let second = workflow
        .create_submission(Some(&bruno()), draft())
        .expect("stored");
    workflow
        .create_submission(Some(&ana()), draft())
        .expect("stored");

    workflow
        .set_status(&admin_actor(), &first, SubmissionStatus::Approved)
        .expect("approve");
    workflow
        .set_status(&admin_actor(), &second, SubmissionStatus::Review)
        .expect("review");

    let pending = workflow
        .list_submissions(
            &admin_actor(),
            SubmissionFilter::new(None, StatusFilter::Only(SubmissionStatus::Pending)),
        )
        .expect("listing");
    assert_eq!(pending.total(), 3);
    assert_eq!(pending.matched(), 1);

    let summary = workflow.status_summary(&admin_actor()).expect("summary");
    assert_eq!(
        summary,
        StatusSummary {
            total: 3,
            pending: 1,
            review: 1,
            approved: 1,
            rejected: 0,
        }
    );
}

#[test]
fn users_only_see_their_own_submissions() {
    let (workflow, _) = build_workflow();
    let mine = workflow
        .create_submission(Some(&ana()), draft())
        .expect("stored");
    workflow
        .create_submission(Some(&bruno()), draft())
        .expect("stored");

    let own = workflow.submissions_for(Some(&ana())).expect("own list");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].id, mine);
    assert!(matches!(
        workflow.submissions_for(None),
        Err(ReviewError::NotAuthenticated)
    ));
}

#[test]
fn proposal_document_is_limited_to_owner_and_admins() {
    let (workflow, _) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("stored");

    let document = workflow
        .proposal_document(&Actor::user(&ana()), &id)
        .expect("owner reads");
    assert_eq!(document.client.name, "Ana Souza");
    assert!(workflow.proposal_document(&admin_actor(), &id).is_ok());
    assert!(matches!(
        workflow.proposal_document(&Actor::user(&bruno()), &id),
        Err(ReviewError::NotFound)
    ));
}

#[test]
fn strangers_cannot_tell_foreign_proposals_from_missing_ones() {
    let (workflow, _) = build_workflow();
    let id = workflow
        .create_submission(Some(&ana()), draft())
        .expect("stored");
    let stranger = Actor::user(&bruno());

    let foreign = workflow.proposal_document(&stranger, &id);
    let missing = workflow.proposal_document(&stranger, &SubmissionId("sub-404404".to_string()));

    assert!(matches!(foreign, Err(ReviewError::NotFound)));
    assert!(matches!(missing, Err(ReviewError::NotFound)));
}
