use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::commands::{NewUser, UserCommand};
use super::errors::UserError;
use super::events::UserEvent;
use super::value_objects::{Email, Username};
use crate::domain::Aggregate;

// ============================================================================
// User Aggregate - Domain Logic
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: Username,
    pub email: Email,
    pub firstname: String,
    pub lastname: String,
    pub loyalty_points: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Validate a registration request and build the user with a fresh id
    pub fn register(input: &NewUser) -> Result<Self, UserError> {
        // Presence of every field is checked before any format rule
        required("username", &input.username)?;
        required("email", &input.email)?;
        let firstname = required("firstname", &input.firstname)?;
        let lastname = required("lastname", &input.lastname)?;

        let username = Username::parse(&input.username)?;
        let email = Email::parse(&input.email)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            firstname,
            lastname,
            loyalty_points: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, UserError> {
    if value.trim().is_empty() {
        return Err(UserError::FieldMissing(field));
    }
    Ok(value.to_string())
}

impl Aggregate for User {
    type Command = UserCommand;
    type Event = UserEvent;
    type Error = UserError;

    fn handle_command(&self, command: &Self::Command) -> Result<Self::Event, Self::Error> {
        match *command {
            UserCommand::AwardPoints(points) => Ok(UserEvent::PointsAwarded {
                points,
                balance: self.loyalty_points.saturating_add(points),
            }),
            UserCommand::RedeemPoints(requested) => {
                if requested < 1 {
                    return Err(UserError::InvalidAmount(requested));
                }
                let points = requested.unsigned_abs();
                let balance = self.loyalty_points.checked_sub(points).ok_or(
                    UserError::InsufficientPoints {
                        requested: points,
                        available: self.loyalty_points,
                    },
                )?;
                Ok(UserEvent::PointsRedeemed { points, balance })
            }
        }
    }

    fn apply_event(&mut self, event: &Self::Event) {
        self.loyalty_points = event.balance();
        self.updated_at = Utc::now();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
