//! Development accounts shared by the fixture login and session adapters.

use crate::domain::{AppRole, SessionUser, UserId};

pub(crate) struct FixtureAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub full_name: &'static str,
    pub roles: &'static [AppRole],
}

pub(crate) const FIXTURE_PASSWORD: &str = "password";

pub(crate) const FIXTURE_ACCOUNTS: &[FixtureAccount] = &[
    FixtureAccount {
        id: "123e4567-e89b-12d3-a456-426614174000",
        email: "admin@fastlease.ae",
        password: FIXTURE_PASSWORD,
        full_name: "Ada Admin",
        roles: &[AppRole::Admin],
    },
    FixtureAccount {
        id: "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        email: "ops@fastlease.ae",
        password: FIXTURE_PASSWORD,
        full_name: "Omar Operations",
        roles: &[AppRole::OpManager],
    },
    FixtureAccount {
        id: "11111111-1111-1111-1111-111111111111",
        email: "client@example.com",
        password: FIXTURE_PASSWORD,
        full_name: "Chloe Client",
        roles: &[AppRole::Client],
    },
    FixtureAccount {
        id: "22222222-2222-2222-2222-222222222222",
        email: "investor@investor.example",
        password: FIXTURE_PASSWORD,
        full_name: "Ivan Investor",
        roles: &[AppRole::Investor],
    },
];

impl FixtureAccount {
    pub(crate) fn by_email(email: &str) -> Option<&'static Self> {
        let normalized = email.trim().to_lowercase();
        FIXTURE_ACCOUNTS
            .iter()
            .find(|account| account.email == normalized)
    }

    pub(crate) fn by_id(id: &UserId) -> Option<&'static Self> {
        FIXTURE_ACCOUNTS
            .iter()
            .find(|account| account.id == id.to_string())
    }

    pub(crate) fn user_id(&self) -> Result<UserId, crate::domain::UserIdError> {
        UserId::new(self.id)
    }

    pub(crate) fn session_user(&self, id: UserId) -> SessionUser {
        SessionUser::new(
            id,
            self.email,
            Some(self.full_name.to_owned()),
            self.roles.to_vec(),
            Vec::new(),
        )
    }
}
