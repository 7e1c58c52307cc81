//! Repository for the `students` table.
//!
//! Five independent, single-statement operations. Every value reaches the
//! database through parameter binding; the only dynamic SQL is the UPDATE
//! column list, and its column names come from [`FIELD_COLUMNS`], never
//! from input.

use roster_core::types::DbId;
use sqlx::mysql::MySql;
use sqlx::{MySqlPool, QueryBuilder};

use crate::error::DbError;
use crate::models::student::{NewStudent, Student, StudentPatch};

/// Column list for `students` queries.
const COLUMNS: &str = "\
    id, first_name, last_name, email, phone, enrollment_date, \
    major, status, graduation_year, created_at, updated_at";

/// Wire field name to storage column, one entry per updatable field.
///
/// The insert, update, and read paths all go through this table so the
/// external names and column names cannot drift apart.
pub const FIELD_COLUMNS: &[(&str, &str)] = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("email", "email"),
    ("phone", "phone"),
    ("enrollmentDate", "enrollment_date"),
    ("major", "major"),
    ("status", "status"),
    ("graduationYear", "graduation_year"),
];

/// Storage column for a wire field name. Unmapped names pass through.
pub fn column_for(field: &str) -> &str {
    FIELD_COLUMNS
        .iter()
        .find(|(wire, _)| *wire == field)
        .map(|(_, column)| *column)
        .unwrap_or(field)
}

/// Provides data access for student records.
pub struct StudentRepo;

impl StudentRepo {
    /// List every student, newest enrollment first.
    pub async fn list_all(pool: &MySqlPool) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students ORDER BY enrollment_date DESC");
        sqlx::query_as::<_, Student>(&query).fetch_all(pool).await
    }

    /// Find a student by primary key.
    ///
    /// Returns `None` when the id has no matching row; errors are reserved
    /// for genuine failures.
    pub async fn find_by_id(pool: &MySqlPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = ?");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a validated record and re-read it by the assigned key.
    ///
    /// The write and the re-read are separate round trips, not a
    /// transaction; a racing delete between them surfaces as
    /// [`DbError::NotFoundAfterWrite`].
    pub async fn create(pool: &MySqlPool, student: &NewStudent) -> Result<Student, DbError> {
        let result = sqlx::query(
            "INSERT INTO students \
                 (first_name, last_name, email, phone, enrollment_date, \
                  major, status, graduation_year) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(&student.email)
        .bind(&student.phone)
        .bind(student.enrollment_date)
        .bind(&student.major)
        .bind(student.status)
        .bind(student.graduation_year)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as DbId;
        Self::find_by_id(pool, id)
            .await?
            .ok_or(DbError::NotFoundAfterWrite { id })
    }

    /// Apply a partial update and return the fresh row.
    ///
    /// Fails with [`DbError::NoFieldsToUpdate`] before issuing any
    /// statement when the patch is empty. Returns `None` when no row
    /// matches `id`.
    pub async fn update(
        pool: &MySqlPool,
        id: DbId,
        patch: &StudentPatch,
    ) -> Result<Option<Student>, DbError> {
        let Some(mut query) = update_query(id, patch) else {
            return Err(DbError::NoFieldsToUpdate);
        };

        query.build().execute(pool).await?;
        Ok(Self::find_by_id(pool, id).await?)
    }

    /// Delete a student by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &MySqlPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build an UPDATE statement covering exactly the supplied fields.
///
/// Returns `None` for an empty patch.
fn update_query<'a>(id: DbId, patch: &'a StudentPatch) -> Option<QueryBuilder<'a, MySql>> {
    if patch.is_empty() {
        return None;
    }

    let mut builder = QueryBuilder::new("UPDATE students SET ");
    {
        let mut set = builder.separated(", ");

        if let Some(first_name) = &patch.first_name {
            set.push(format!("{} = ", column_for("firstName")));
            set.push_bind_unseparated(first_name.as_str());
        }
        if let Some(last_name) = &patch.last_name {
            set.push(format!("{} = ", column_for("lastName")));
            set.push_bind_unseparated(last_name.as_str());
        }
        if let Some(email) = &patch.email {
            set.push(format!("{} = ", column_for("email")));
            set.push_bind_unseparated(email.as_str());
        }
        if let Some(phone) = &patch.phone {
            set.push(format!("{} = ", column_for("phone")));
            set.push_bind_unseparated(phone.as_str());
        }
        if let Some(enrollment_date) = patch.enrollment_date {
            set.push(format!("{} = ", column_for("enrollmentDate")));
            set.push_bind_unseparated(enrollment_date);
        }
        if let Some(major) = &patch.major {
            set.push(format!("{} = ", column_for("major")));
            set.push_bind_unseparated(major.as_str());
        }
        if let Some(status) = patch.status {
            set.push(format!("{} = ", column_for("status")));
            set.push_bind_unseparated(status);
        }
        if let Some(graduation_year) = patch.graduation_year {
            set.push(format!("{} = ", column_for("graduationYear")));
            set.push_bind_unseparated(graduation_year);
        }
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    Some(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::student::StudentStatus;
    use roster_core::validation::wire_name;

    #[test]
    fn mapping_covers_every_updatable_field() {
        // Every entry must round-trip through the wire-name conversion and
        // name a column the read path actually selects.
        for (wire, column) in FIELD_COLUMNS {
            assert_eq!(wire_name(column), *wire, "mapping drifted for {column}");
            assert!(COLUMNS.contains(column), "{column} missing from SELECT list");
        }
    }

    #[test]
    fn unmapped_fields_pass_through() {
        assert_eq!(column_for("firstName"), "first_name");
        assert_eq!(column_for("id"), "id");
    }

    #[test]
    fn update_query_covers_exactly_the_supplied_fields() {
        let patch = StudentPatch {
            status: Some(StudentStatus::Graduated),
            graduation_year: Some(2028),
            ..StudentPatch::default()
        };
        let query = update_query(7, &patch).unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE students SET status = ?, graduation_year = ? WHERE id = ?"
        );
    }

    #[test]
    fn update_query_binds_every_value() {
        let patch = StudentPatch {
            first_name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..StudentPatch::default()
        };
        let query = update_query(1, &patch).unwrap();
        // No literal values may appear in the statement text.
        assert!(!query.sql().contains("Ada"));
        assert!(!query.sql().contains("ada@example.com"));
    }

    #[test]
    fn update_query_rejects_empty_patch() {
        assert!(update_query(1, &StudentPatch::default()).is_none());
    }
}
