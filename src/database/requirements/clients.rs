// ABOUTME: Client and program queries for the requirements toolkit
// ABOUTME: Client listing, program lookup by prefix and per-program summary statistics

use sqlx::Row;
use uuid::Uuid;

use super::{order_by_workflow, RequirementsDatabase};
use crate::constants::workflow::{STORY_STATUSES, TEST_STATUSES};
use crate::errors::AppResult;
use crate::models::requirements::{Client, Program, ProgramSummary};

const PROGRAM_COLUMNS: &str =
    "program_id, client_id, name, prefix, program_type, description, source_file, status";

impl RequirementsDatabase {
    /// Create a client and return its id
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the name is taken
    pub async fn create_client(
        &self,
        name: &str,
        description: Option<&str>,
        primary_contact: Option<&str>,
        contact_email: Option<&str>,
    ) -> AppResult<String> {
        let client_id = Uuid::new_v4().to_string();
        sqlx::query(
            r"
            INSERT INTO clients (client_id, name, description, primary_contact, contact_email)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(&client_id)
        .bind(name)
        .bind(description)
        .bind(primary_contact)
        .bind(contact_email)
        .execute(&self.pool)
        .await?;
        Ok(client_id)
    }

    /// Create a program for a client and return its id
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the prefix is taken
    pub async fn create_program(
        &self,
        client_id: &str,
        name: &str,
        prefix: &str,
        program_type: Option<&str>,
        description: Option<&str>,
        source_file: Option<&str>,
    ) -> AppResult<String> {
        let program_id = Uuid::new_v4().to_string();
        sqlx::query(
            r"
            INSERT INTO programs (program_id, client_id, name, prefix, program_type, description, source_file)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(&program_id)
        .bind(client_id)
        .bind(name)
        .bind(prefix.to_uppercase())
        .bind(program_type)
        .bind(description)
        .bind(source_file)
        .execute(&self.pool)
        .await?;
        Ok(program_id)
    }

    /// Clients ordered by name; `None` lists every client
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_clients(&self, status: Option<&str>) -> AppResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r"
            SELECT client_id, name, description, primary_contact, contact_email, status
            FROM clients
            WHERE ($1 IS NULL OR status = $1)
            ORDER BY name
            ",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(clients)
    }

    /// Client by exact (case-insensitive) name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_client_by_name(&self, name: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r"
            SELECT client_id, name, description, primary_contact, contact_email, status
            FROM clients
            WHERE LOWER(name) = LOWER($1)
            ",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(client)
    }

    /// Programs of a client ordered by name; `None` status lists all
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_programs(
        &self,
        client_id: &str,
        status: Option<&str>,
    ) -> AppResult<Vec<Program>> {
        let sql = format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs \
             WHERE client_id = $1 AND ($2 IS NULL OR status = $2) ORDER BY name"
        );
        let programs = sqlx::query_as::<_, Program>(&sql)
            .bind(client_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(programs)
    }

    /// Program by prefix, compared in upper case
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_program_by_prefix(&self, prefix: &str) -> AppResult<Option<Program>> {
        let sql = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE UPPER(prefix) = $1");
        let program = sqlx::query_as::<_, Program>(&sql)
            .bind(prefix.trim().to_uppercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(program)
    }

    /// Counts, status breakdowns and requirement coverage of a program
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn get_program_summary(&self, program_id: &str) -> AppResult<ProgramSummary> {
        let counts = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM requirements WHERE program_id = $1) AS requirement_count,
                (SELECT COUNT(*) FROM user_stories WHERE program_id = $1) AS story_count,
                (SELECT COUNT(*) FROM uat_test_cases WHERE program_id = $1) AS test_count
            ",
        )
        .bind(program_id)
        .fetch_one(&self.pool)
        .await?;

        let stories_by_status = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM user_stories WHERE program_id = $1 GROUP BY status",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let tests_by_status = sqlx::query_as::<_, (String, i64)>(
            "SELECT test_status, COUNT(*) FROM uat_test_cases WHERE program_id = $1 GROUP BY test_status",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let requirement_count: i64 = counts.get("requirement_count");
        let coverage = if requirement_count > 0 {
            Some(self.requirement_coverage(program_id).await?)
        } else {
            None
        };

        Ok(ProgramSummary {
            requirement_count,
            story_count: counts.get("story_count"),
            test_count: counts.get("test_count"),
            stories_by_status: order_by_workflow(stories_by_status, &STORY_STATUSES),
            tests_by_status: order_by_workflow(tests_by_status, &TEST_STATUSES),
            coverage,
        })
    }
}
