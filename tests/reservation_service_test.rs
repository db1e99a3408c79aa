//! Reservation service unit tests.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mockall::predicate::eq;

use common::{local, reservation, user, TestUnitOfWork};
use petcare_api::domain::{
    NewReservation, PetsitterWork, ReservationStatus, ServiceCategorical, UserType, VetSpecialty,
};
use petcare_api::errors::AppError;
use petcare_api::infra::{
    MockNotificationGateway, MockReservationRepository, NotificationError,
};
use petcare_api::services::{MockUserService, ReservationManager, ReservationService};

fn manager(
    repo: MockReservationRepository,
    users: MockUserService,
    notifier: MockNotificationGateway,
) -> ReservationManager<TestUnitOfWork> {
    ReservationManager::new(
        TestUnitOfWork::for_reservations(repo),
        Arc::new(users),
        Arc::new(notifier),
    )
}

fn new_reservation(user_type: UserType) -> NewReservation {
    NewReservation {
        user_id: 1,
        partner_id: 7,
        pet_id: 3,
        user_type,
        vet_specialties: vec![VetSpecialty::Dentistry],
        petsitter_works: vec![PetsitterWork::Walk],
        created_at: local(2025, 3, 14, 9, 30),
        image_urls: vec![],
        content: "limping".to_string(),
    }
}

#[tokio::test]
async fn test_create_hospital_keeps_only_specialties() {
    let mut repo = MockReservationRepository::new();
    repo.expect_create()
        .withf(|input| {
            input.service_categorical == ServiceCategorical::Hospital
                && input.status == ReservationStatus::Waiting
                && input.vet_specialties == vec![VetSpecialty::Dentistry]
                && input.petsitter_works.is_empty()
        })
        .returning(|_| Ok(reservation(10, ReservationStatus::Waiting)));

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert_eq!(
        service
            .create(new_reservation(UserType::Hospital))
            .await
            .unwrap(),
        10
    );
}

#[tokio::test]
async fn test_create_requires_service_list() {
    let mut repo = MockReservationRepository::new();
    repo.expect_create().times(0);

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    let mut hospital = new_reservation(UserType::Hospital);
    hospital.vet_specialties.clear();
    assert!(matches!(
        service.create(hospital).await,
        Err(AppError::Validation(_))
    ));

    let mut sitter = new_reservation(UserType::Sitter);
    sitter.petsitter_works.clear();
    assert!(matches!(
        service.create(sitter).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_create_rejects_general_user_type() {
    let mut repo = MockReservationRepository::new();
    repo.expect_create().times(0);

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(matches!(
        service.create(new_reservation(UserType::General)).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_accept_without_device_token_sends_nothing() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .with(eq(10))
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Waiting))));
    repo.expect_transition_status()
        .with(
            eq(10),
            eq(ReservationStatus::Waiting),
            eq(ReservationStatus::Confirmed),
            eq(None),
        )
        .times(1)
        .returning(|_, _, _, _| Ok(true));

    let mut users = MockUserService::new();
    users
        .expect_get_user()
        .with(eq(1))
        .returning(|id| Ok(user(id, UserType::General)));

    let mut notifier = MockNotificationGateway::new();
    notifier.expect_send().times(0);

    let service = manager(repo, users, notifier);

    assert_eq!(
        service.accept(10, 7).await.unwrap(),
        ReservationStatus::Confirmed
    );
}

#[tokio::test]
async fn test_accept_notifies_owner_and_absorbs_delivery_failure() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Waiting))));
    repo.expect_transition_status()
        .returning(|_, _, _, _| Ok(true));

    let mut users = MockUserService::new();
    users.expect_get_user().returning(|id| {
        let mut owner = user(id, UserType::General);
        owner.fcm_token = Some("device-token".to_string());
        Ok(owner)
    });

    let mut notifier = MockNotificationGateway::new();
    notifier
        .expect_send()
        .withf(|message| {
            message.token == "device-token"
                && message.data.get("reservation_id").map(String::as_str) == Some("10")
        })
        .times(1)
        .returning(|_| {
            Err(NotificationError::Rejected {
                status: 404,
                body: "UNREGISTERED".to_string(),
            })
        });

    let service = manager(repo, users, notifier);

    assert_eq!(
        service.accept(10, 7).await.unwrap(),
        ReservationStatus::Confirmed
    );
}

#[tokio::test]
async fn test_accept_by_other_partner_is_forbidden() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Waiting))));
    repo.expect_transition_status().times(0);

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(matches!(
        service.accept(10, 8).await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn test_accept_twice_is_invalid_transition() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Confirmed))));
    repo.expect_transition_status().times(0);

    let mut notifier = MockNotificationGateway::new();
    notifier.expect_send().times(0);

    let service = manager(repo, MockUserService::new(), notifier);

    assert!(matches!(
        service.accept(10, 7).await,
        Err(AppError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_accept_missing_reservation() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(matches!(
        service.accept(10, 7).await,
        Err(AppError::NotFound("reservation"))
    ));
}

#[tokio::test]
async fn test_concurrent_transition_loses() {
    let reads = AtomicUsize::new(0);

    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id().returning(move |id| {
        // The second read sees the owner's cancellation
        let status = if reads.fetch_add(1, Ordering::SeqCst) == 0 {
            ReservationStatus::Waiting
        } else {
            ReservationStatus::CancelledByUser
        };
        Ok(Some(reservation(id, status)))
    });
    repo.expect_transition_status()
        .returning(|_, _, _, _| Ok(false));

    let mut notifier = MockNotificationGateway::new();
    notifier.expect_send().times(0);

    let service = manager(repo, MockUserService::new(), notifier);

    match service.accept(10, 7).await {
        Err(AppError::InvalidTransition { from, to }) => {
            assert_eq!(from, "CANCELLED_BY_USER");
            assert_eq!(to, "CONFIRMED");
        }
        other => panic!("expected InvalidTransition, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_stamps_canceled_at() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Confirmed))));
    repo.expect_transition_status()
        .withf(|id, expected, next, canceled_at| {
            *id == 10
                && *expected == ReservationStatus::Confirmed
                && *next == ReservationStatus::CancelledByUser
                && canceled_at.is_some()
        })
        .times(1)
        .returning(|_, _, _, _| Ok(true));

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert_eq!(
        service.cancel(10, 1).await.unwrap(),
        ReservationStatus::CancelledByUser
    );
}

#[tokio::test]
async fn test_only_owner_cancels_and_only_partner_rejects() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Waiting))));
    repo.expect_transition_status().times(0);

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    // user 7 is the partner, not the owner
    assert!(matches!(service.cancel(10, 7).await, Err(AppError::Forbidden)));
    // user 1 is the owner, not the partner
    assert!(matches!(service.reject(10, 1).await, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_complete_requires_check_in() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Confirmed))));

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(matches!(
        service.complete(10, 7).await,
        Err(AppError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_my_reservations_filters_and_labels() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_user_id().with(eq(1)).returning(|_| {
        let mut sitter = reservation(11, ReservationStatus::Waiting);
        sitter.service_categorical = ServiceCategorical::Sitter;
        sitter.partner_id = 8;
        sitter.vet_specialties = vec![];
        sitter.petsitter_works = vec![PetsitterWork::Walk];
        sitter.created_at = local(2025, 3, 15, 14, 0);

        Ok(vec![reservation(10, ReservationStatus::Waiting), sitter])
    });

    let mut users = MockUserService::new();
    users.expect_get_user().with(eq(7)).times(1).returning(|id| {
        let mut partner = user(id, UserType::Hospital);
        partner.username = "Happy Vet".to_string();
        Ok(partner)
    });
    users.expect_get_user().with(eq(8)).times(0);

    let service = manager(repo, users, MockNotificationGateway::new());
    let summaries = service
        .my_reservations(1, Some("hospital".to_string()))
        .await
        .unwrap();

    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.reservation_id, 10);
    assert_eq!(summary.service_type, "HOSPITAL");
    assert_eq!(summary.slot_label, "오전 진료");
    assert_eq!(summary.date, "2025.03.14");
    assert_eq!(summary.hour, 9);
    assert_eq!(summary.partner_name, "Happy Vet");
    assert_eq!(summary.specialties, vec!["DENTISTRY", "SURGERY"]);
    assert_eq!(summary.status, "WAITING");
}

#[tokio::test]
async fn test_my_reservations_unfiltered_keeps_order_and_tolerates_missing_partner() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_user_id().returning(|_| {
        let mut afternoon = reservation(12, ReservationStatus::Completed);
        afternoon.partner_id = 9;
        afternoon.created_at = local(2025, 3, 16, 12, 0);
        Ok(vec![reservation(10, ReservationStatus::Waiting), afternoon])
    });

    let mut users = MockUserService::new();
    users
        .expect_get_user()
        .with(eq(7))
        .returning(|id| Ok(user(id, UserType::Hospital)));
    users
        .expect_get_user()
        .with(eq(9))
        .returning(|_| Err(AppError::NotFound("user")));

    let service = manager(repo, users, MockNotificationGateway::new());
    let summaries = service.my_reservations(1, None).await.unwrap();

    assert_eq!(
        summaries.iter().map(|s| s.reservation_id).collect::<Vec<_>>(),
        vec![10, 12]
    );
    assert_eq!(summaries[0].partner_name, "user7");
    assert_eq!(summaries[1].partner_name, "");
    assert_eq!(summaries[1].slot_label, "오후 진료");
}

#[tokio::test]
async fn test_update_image_on_missing_reservation() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update_image_urls().times(0);

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(matches!(
        service.update_image(10, "/media/reservations/10/a.png".to_string()).await,
        Err(AppError::NotFound("reservation"))
    ));
}

#[tokio::test]
async fn test_update_image_replaces_urls() {
    let mut repo = MockReservationRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(reservation(id, ReservationStatus::Waiting))));
    repo.expect_update_image_urls()
        .with(eq(10), eq(vec!["http://localhost:8080/media/reservations/10/a.png".to_string()]))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = manager(repo, MockUserService::new(), MockNotificationGateway::new());

    assert!(service
        .update_image(
            10,
            "http://localhost:8080/media/reservations/10/a.png".to_string()
        )
        .await
        .is_ok());
}
