use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Learner,
    Teacher,
    Writer,
    Volunteer,
    StoryManager,
    /// Coordinator: decides the publication format
    BookManager,
    ContentAdmin,
    Admin,
    /// Automated hand-offs between stages, never held by a person
    System,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Learner,
        Role::Teacher,
        Role::Writer,
        Role::Volunteer,
        Role::StoryManager,
        Role::BookManager,
        Role::ContentAdmin,
        Role::Admin,
        Role::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Learner => "LEARNER",
            Role::Teacher => "TEACHER",
            Role::Writer => "WRITER",
            Role::Volunteer => "VOLUNTEER",
            Role::StoryManager => "STORY_MANAGER",
            Role::BookManager => "BOOK_MANAGER",
            Role::ContentAdmin => "CONTENT_ADMIN",
            Role::Admin => "ADMIN",
            Role::System => "SYSTEM",
        }
    }

    /// Roles that run the publishing pipeline: they may use bulk operations
    /// and can be assigned as reviewers.
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Role::StoryManager | Role::BookManager | Role::ContentAdmin | Role::Admin
        )
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: "role",
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_roles() {
        let staff: Vec<_> = Role::ALL.into_iter().filter(Role::is_staff).collect();
        assert_eq!(
            staff,
            vec![Role::StoryManager, Role::BookManager, Role::ContentAdmin, Role::Admin]
        );
    }

    #[test]
    fn roles_round_trip_through_text() {
        assert_eq!("BOOK_MANAGER".parse::<Role>().unwrap(), Role::BookManager);
        assert!("book_manager".parse::<Role>().is_err());
    }
}
