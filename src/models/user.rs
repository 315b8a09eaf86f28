use rocket::FromForm;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration form as submitted by the `/register` page.
#[derive(FromForm, Validate, Debug, Clone)]
pub struct RegisterForm {
    #[field(default = String::new())]
    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,
    #[field(default = String::new())]
    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
    #[field(default = String::new())]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[field(default = String::new())]
    #[validate(length(min = 3, message = "Password must be at least 3 characters"))]
    pub password: String,
    #[field(default = String::new())]
    pub csrf_token: String,
}

impl RegisterForm {
    /// Trimmed copy with the email lowercased; the password is left as typed.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: crate::util::normalize_email(&self.email),
            password: self.password.clone(),
            csrf_token: self.csrf_token.clone(),
        }
    }
}

/// Missing fields read as empty and simply fail to authenticate.
#[derive(FromForm, Debug, Clone)]
pub struct LoginForm {
    #[field(default = String::new())]
    pub email: String,
    #[field(default = String::new())]
    pub password: String,
    #[field(default = String::new())]
    pub csrf_token: String,
}
