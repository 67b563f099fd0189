use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// Wire representation of a user
///
/// `id` is ignored on create and always present in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub active: bool,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            age: dto.age,
            active: dto.active,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            age: user.age,
            active: user.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_without_id() {
        let dto: UserDto = serde_json::from_value(json!({
            "firstName": "Mark",
            "lastName": "Avrelly",
            "email": "ma@gmail.com",
            "age": 15,
            "active": true
        }))
        .unwrap();

        assert_eq!(dto.id, None);
        assert_eq!(dto.first_name, "Mark");
        assert_eq!(dto.last_name, "Avrelly");
    }

    #[test]
    fn missing_field_is_rejected() {
        let result = serde_json::from_value::<UserDto>(json!({
            "firstName": "Mark",
            "email": "ma@gmail.com",
            "age": 15,
            "active": true
        }));

        assert!(result.is_err());
    }

    #[test]
    fn serializes_id_as_null_when_unset() {
        let dto = UserDto::from(User::new("Mark", "Avrelly", "ma@gmail.com", 15, true));
        let value = serde_json::to_value(&dto).unwrap();

        assert!(value["id"].is_null());
        assert_eq!(value["firstName"], "Mark");
    }

    #[test]
    fn mapping_preserves_every_field() {
        let user = User::new("Lucius", "Verus", "lv@gmail.com", 18, false).with_id(100001);
        assert_eq!(User::from(UserDto::from(user.clone())), user);
    }
}
