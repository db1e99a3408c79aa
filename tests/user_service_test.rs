//! User service unit tests.

mod common;

use chrono::NaiveDate;
use mockall::predicate::eq;

use common::{user, TestUnitOfWork};
use petcare_api::domain::{
    CaCategorical, Gender, NewUser, PartnerProfile, Password, PetsitterWork, User, UserStatus,
    UserType, VetSpecialty,
};
use petcare_api::errors::AppError;
use petcare_api::infra::MockUserRepository;
use petcare_api::services::{UserManager, UserService};

fn new_user(user_type: UserType, partner: PartnerProfile) -> NewUser {
    NewUser {
        username: " kim ".to_string(),
        nickname: "doglover".to_string(),
        email: "kim@example.com".to_string(),
        password: "SecurePass123!".to_string(),
        gender: Gender::Female,
        birthdate: NaiveDate::from_ymd_opt(1990, 1, 31).unwrap(),
        address: "Seoul".to_string(),
        user_type,
        partner,
    }
}

fn full_partner_profile() -> PartnerProfile {
    PartnerProfile {
        tin: Some("123-45-67890".to_string()),
        ca_categorical: Some(CaCategorical::Both),
        vet_specialty: Some(VetSpecialty::Dentistry),
        petsitter_work: Some(PetsitterWork::Walk),
        working_days: vec!["MON".to_string(), "TUE".to_string()],
        working_start_hours: Some("09:00".to_string()),
        working_end_hours: Some("18:00".to_string()),
    }
}

fn with_password(mut user: User, plain: &str) -> User {
    user.password_hash = Password::new(plain).unwrap().into_string();
    user
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email()
        .withf(|email| email == "kim@example.com")
        .returning(|_| Ok(true));
    repo.expect_create().times(0);

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let result = service
        .signup(new_user(UserType::General, PartnerProfile::default()))
        .await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_signup_race_lost_at_unique_index() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email().returning(|_| Ok(false));
    repo.expect_create()
        .times(1)
        .returning(|_| Err(AppError::DuplicateEmail));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let result = service
        .signup(new_user(UserType::General, PartnerProfile::default()))
        .await;

    assert!(matches!(result, Err(AppError::DuplicateEmail)));
}

#[tokio::test]
async fn test_general_signup_drops_partner_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email().returning(|_| Ok(false));
    repo.expect_create()
        .withf(|input| {
            input.partner.is_empty()
                && input.status == UserStatus::Active
                && input.username == "kim"
                && Password::from_hash(input.password_hash.clone()).verify("SecurePass123!")
        })
        .returning(|input| {
            let mut created = user(11, input.user_type);
            created.partner = input.partner;
            Ok(created)
        });

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let id = service
        .signup(new_user(UserType::General, full_partner_profile()))
        .await
        .unwrap();

    assert_eq!(id, 11);
}

#[tokio::test]
async fn test_hospital_signup_keeps_specialty_not_work() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email().returning(|_| Ok(false));
    repo.expect_create()
        .withf(|input| {
            input.partner.vet_specialty == Some(VetSpecialty::Dentistry)
                && input.partner.petsitter_work.is_none()
                && input.partner.tin.as_deref() == Some("123-45-67890")
        })
        .returning(|input| Ok(user(12, input.user_type)));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let id = service
        .signup(new_user(UserType::Hospital, full_partner_profile()))
        .await
        .unwrap();

    assert_eq!(id, 12);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let mut repo = MockUserRepository::new();
    repo.expect_exists_by_email().returning(|_| Ok(false));
    repo.expect_create().times(0);

    let mut input = new_user(UserType::General, PartnerProfile::default());
    input.password = "short".to_string();

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    assert!(matches!(
        service.signup(input).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_login_success() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email == "user1@example.com")
        .returning(|_| Ok(Some(with_password(user(1, UserType::General), "SecurePass123!"))));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let logged_in = service
        .login(" user1@example.com ".to_string(), "SecurePass123!".to_string())
        .await
        .unwrap();

    assert_eq!(logged_in.id, 1);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_email()
        .withf(|email| email == "user1@example.com")
        .returning(|_| Ok(Some(with_password(user(1, UserType::General), "SecurePass123!"))));
    repo.expect_find_by_email()
        .withf(|email| email == "locked@example.com")
        .returning(|_| {
            let mut locked = with_password(user(2, UserType::General), "SecurePass123!");
            locked.status = UserStatus::Locked;
            Ok(Some(locked))
        });
    repo.expect_find_by_email()
        .withf(|email| email == "nobody@example.com")
        .returning(|_| Ok(None));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));

    for (email, password) in [
        ("user1@example.com", "WrongPass123!"),
        ("locked@example.com", "SecurePass123!"),
        ("nobody@example.com", "SecurePass123!"),
    ] {
        let result = service.login(email.to_string(), password.to_string()).await;
        assert!(
            matches!(result, Err(AppError::InvalidCredentials)),
            "{} should fail with InvalidCredentials",
            email
        );
    }
}

#[tokio::test]
async fn test_list_partners_rejects_non_directory_types() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_user_type().times(0);

    let service = UserManager::new(TestUnitOfWork::for_users(repo));

    for user_type in [UserType::General, UserType::Seller, UserType::Grooming, UserType::Cafe] {
        assert!(matches!(
            service.list_partners(user_type).await,
            Err(AppError::UnsupportedOperation(_))
        ));
    }
}

#[tokio::test]
async fn test_list_partners_hospital() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_user_type()
        .with(eq(UserType::Hospital))
        .returning(|_| Ok(vec![user(7, UserType::Hospital), user(8, UserType::Hospital)]));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));
    let partners = service.list_partners(UserType::Hospital).await.unwrap();

    assert_eq!(partners.len(), 2);
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().with(eq(99)).returning(|_| Ok(None));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));

    assert!(matches!(
        service.get_user(99).await,
        Err(AppError::NotFound("user"))
    ));
}

#[tokio::test]
async fn test_blank_fcm_token_is_rejected() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_fcm_token().times(0);

    let service = UserManager::new(TestUnitOfWork::for_users(repo));

    assert!(matches!(
        service.update_fcm_token(1, "   ".to_string()).await,
        Err(AppError::Validation(_))
    ));
}

#[tokio::test]
async fn test_fcm_token_is_trimmed() {
    let mut repo = MockUserRepository::new();
    repo.expect_update_fcm_token()
        .with(eq(1), eq("device-token".to_string()))
        .times(1)
        .returning(|_, _| Ok(()));

    let service = UserManager::new(TestUnitOfWork::for_users(repo));

    assert!(service
        .update_fcm_token(1, " device-token ".to_string())
        .await
        .is_ok());
}
