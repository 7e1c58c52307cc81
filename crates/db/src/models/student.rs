//! Student entity and request DTOs.
//!
//! The DTOs carry the full validation schema. `validated()` runs every
//! rule, reports all violations at once, and normalizes the payload into
//! a storage-ready shape (the enrollment date string becomes a
//! [`NaiveDate`]).

use chrono::NaiveDate;
use roster_core::types::{DbId, Timestamp};
use roster_core::validation::{self, FieldViolation};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrollment_date: NaiveDate,
    pub major: String,
    pub status: StudentStatus,
    pub graduation_year: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Closed enumeration of enrollment states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a student. `phone` and `graduation_year` are optional;
/// everything else is mandatory.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: String,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(
        custom(function = validation::validate_phone),
        length(max = 20, message = "Phone number must be at most 20 characters")
    )]
    pub phone: Option<String>,

    /// Checked and normalized in [`CreateStudent::validated`]; the date
    /// rule is not expressible as a derive attribute.
    pub enrollment_date: String,

    #[validate(length(min = 1, max = 100, message = "Major must be between 1 and 100 characters"))]
    pub major: String,

    pub status: StudentStatus,

    #[validate(range(min = 2000, max = 2100, message = "Graduation year must be between 2000 and 2100"))]
    pub graduation_year: Option<i32>,
}

/// DTO for partially updating a student. Present fields must be
/// well-formed; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be between 1 and 100 characters"))]
    pub last_name: Option<String>,

    #[validate(
        email(message = "Invalid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(
        custom(function = validation::validate_phone),
        length(max = 20, message = "Phone number must be at most 20 characters")
    )]
    pub phone: Option<String>,

    pub enrollment_date: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Major must be between 1 and 100 characters"))]
    pub major: Option<String>,

    pub status: Option<StudentStatus>,

    #[validate(range(min = 2000, max = 2100, message = "Graduation year must be between 2000 and 2100"))]
    pub graduation_year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Validated, storage-ready shapes
// ---------------------------------------------------------------------------

/// A create payload that has passed every schema rule.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub enrollment_date: NaiveDate,
    pub major: String,
    pub status: StudentStatus,
    pub graduation_year: Option<i32>,
}

/// A validated partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub major: Option<String>,
    pub status: Option<StudentStatus>,
    pub graduation_year: Option<i32>,
}

impl StudentPatch {
    /// True when no field is set; the repository refuses such patches.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.enrollment_date.is_none()
            && self.major.is_none()
            && self.status.is_none()
            && self.graduation_year.is_none()
    }
}

impl CreateStudent {
    /// Run the full schema and normalize into a [`NewStudent`].
    ///
    /// All violations are collected before returning, including the date
    /// check, so clients see every problem in one response.
    pub fn validated(&self) -> Result<NewStudent, Vec<FieldViolation>> {
        let mut violations = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation::field_violations(&errors),
        };

        let enrollment_date = validation::parse_enrollment_date(&self.enrollment_date);
        if enrollment_date.is_none() {
            violations.push(FieldViolation {
                field: "enrollmentDate".into(),
                message: "Invalid date format".into(),
            });
        }

        match (enrollment_date, violations.is_empty()) {
            (Some(enrollment_date), true) => Ok(NewStudent {
                first_name: self.first_name.clone(),
                last_name: self.last_name.clone(),
                email: self.email.clone(),
                phone: self.phone.clone(),
                enrollment_date,
                major: self.major.clone(),
                status: self.status,
                graduation_year: self.graduation_year,
            }),
            _ => Err(violations),
        }
    }
}

impl UpdateStudent {
    /// Validate the present fields and normalize into a [`StudentPatch`].
    ///
    /// An empty payload is NOT rejected here; that is the repository's
    /// call to make.
    pub fn validated(&self) -> Result<StudentPatch, Vec<FieldViolation>> {
        let mut violations = match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => validation::field_violations(&errors),
        };

        let enrollment_date = match &self.enrollment_date {
            Some(raw) => match validation::parse_enrollment_date(raw) {
                Some(date) => Some(date),
                None => {
                    violations.push(FieldViolation {
                        field: "enrollmentDate".into(),
                        message: "Invalid date format".into(),
                    });
                    None
                }
            },
            None => None,
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(StudentPatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            enrollment_date,
            major: self.major.clone(),
            status: self.status,
            graduation_year: self.graduation_year,
        })
    }
}
