/// First identifier a store hands out
pub const FIRST_USER_ID: i32 = 100_000;

/// User entity as held by the store
///
/// `id` is `None` until the store assigns one on first save and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i32,
    pub active: bool,
}

impl User {
    /// Creates a user that has not been persisted yet
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        age: i32,
        active: bool,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            age,
            active,
        }
    }

    /// Returns a copy of this user carrying the given identifier
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces every mutable field with the values from `other`
    ///
    /// The identifier is left untouched.
    pub fn replace_fields(&mut self, other: User) {
        self.first_name = other.first_name;
        self.last_name = other.last_name;
        self.email = other.email;
        self.age = other.age;
        self.active = other.active;
    }
}
