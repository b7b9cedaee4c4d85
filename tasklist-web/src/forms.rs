/// Form schemas and validation
///
/// Each HTML form is deserialized from `application/x-www-form-urlencoded`
/// into an input struct, normalized (trimming, checkbox handling) and then
/// validated into a list of field-level errors. Fields a form doesn't declare,
/// such as `user_id` or `id`, are ignored by deserialization.
///
/// # Example
///
/// ```
/// use tasklist_web::forms::{TaskForm, TaskFormInput};
///
/// let form = TaskForm::from(TaskFormInput {
///     title: "  Buy milk ".to_string(),
///     description: String::new(),
///     complete: Some("on".to_string()),
/// });
///
/// assert!(form.validate().is_ok());
/// assert_eq!(form.title, "Buy milk");
/// assert_eq!(form.description, None);
/// assert!(form.complete);
/// ```

use serde::{Deserialize, Serialize};
use tasklist_shared::{
    auth::password::validate_password_strength,
    models::{
        task::{CreateTask, Task, UpdateTask, MAX_TITLE_LENGTH},
        user::{is_valid_username_char, MAX_USERNAME_LENGTH},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Key for errors that belong to the whole form rather than one field
pub const NON_FIELD: &str = "__all__";

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation, or [`NON_FIELD`]
    pub field: String,

    /// Error message
    pub message: String,
}

/// Errors collected while validating one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error against `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Records an error against the whole form
    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD, message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against `field`, in the order they were added
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Messages recorded against the whole form
    pub fn non_field(&self) -> impl Iterator<Item = &str> + '_ {
        self.for_field(NON_FIELD)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<validator::ValidationErrors> for FormErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut form_errors = FormErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Enter a valid value.".to_string());
                form_errors.add(field, message);
            }
        }
        form_errors
    }
}

/// PostgreSQL text can't hold U+0000
fn has_null_character(value: &str) -> bool {
    value.contains('\0')
}

/// Interprets an HTML checkbox value
///
/// An absent box is unchecked; `"false"` and the empty string also count as
/// unchecked, any other submitted value as checked.
pub fn checkbox(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !(v.is_empty() || v.eq_ignore_ascii_case("false")),
    }
}

/// Raw task form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFormInput {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Present only when the checkbox is ticked
    #[serde(default)]
    pub complete: Option<String>,
}

/// Task fields after normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TaskForm {
    #[validate(length(
        max = MAX_TITLE_LENGTH,
        message = "Ensure this value has at most 200 characters."
    ))]
    pub title: String,

    pub description: Option<String>,

    pub complete: bool,
}

impl From<TaskFormInput> for TaskForm {
    fn from(input: TaskFormInput) -> Self {
        let description = input.description.trim();
        Self {
            title: input.title.trim().to_string(),
            description: if description.is_empty() {
                None
            } else {
                Some(description.to_string())
            },
            complete: checkbox(input.complete.as_deref()),
        }
    }
}

impl From<&Task> for TaskForm {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            complete: task.complete,
        }
    }
}

impl TaskForm {
    /// Checks the title is present and short enough and that no field holds
    /// a null character
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        if self.title.is_empty() {
            errors.add("title", REQUIRED);
        } else if let Err(e) = Validate::validate(self) {
            errors = e.into();
        }

        if has_null_character(&self.title) {
            errors.add("title", NULL_CHARACTERS);
        }
        if self.description.as_deref().is_some_and(has_null_character) {
            errors.add("description", NULL_CHARACTERS);
        }

        errors.into_result()
    }

    /// Insert payload; the owner is always the requester
    pub fn into_create(self, owner: Uuid) -> CreateTask {
        CreateTask {
            user_id: owner,
            title: self.title,
            description: self.description,
            complete: self.complete,
        }
    }

    pub fn into_update(self) -> UpdateTask {
        UpdateTask {
            title: self.title,
            description: self.description,
            complete: self.complete,
        }
    }
}

/// Login form submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Surrounding whitespace is not part of a username
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }

    /// Checks both fields were filled in
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.username.is_empty() {
            errors.add("username", REQUIRED);
        } else if has_null_character(&self.username) {
            errors.add("username", NULL_CHARACTERS);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        } else if has_null_character(&self.password) {
            errors.add("password", NULL_CHARACTERS);
        }
        errors.into_result()
    }
}

/// Registration form submission
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(
        max = MAX_USERNAME_LENGTH,
        message = "Ensure this value has at most 150 characters."
    ))]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub password_confirm: String,
}

impl RegisterForm {
    /// Surrounding whitespace is not part of a username
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trim().to_string();
        self
    }

    /// Runs every check that doesn't need the database
    ///
    /// All problems are reported together. Password rules run only once both
    /// password fields are filled in and match.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => FormErrors::new(),
            Err(e) => e.into(),
        };

        if self.username.is_empty() {
            errors.add("username", REQUIRED);
        } else if !self.username.chars().all(is_valid_username_char) {
            errors.add("username", INVALID_USERNAME);
        }

        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        } else if has_null_character(&self.password) {
            errors.add("password", NULL_CHARACTERS);
        }
        if self.password_confirm.is_empty() {
            errors.add("password_confirm", REQUIRED);
        }

        if !self.password.is_empty() && !self.password_confirm.is_empty() {
            if self.password != self.password_confirm {
                errors.add("password_confirm", PASSWORD_MISMATCH);
            } else if let Err(problems) = validate_password_strength(&self.password, &self.username)
            {
                for problem in problems {
                    errors.add("password", problem);
                }
            }
        }

        errors.into_result()
    }
}
