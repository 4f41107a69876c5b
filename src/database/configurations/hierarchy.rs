// ABOUTME: Program, clinic and location hierarchy storage and name resolution
// ABOUTME: Resolves user-typed names, prefixes and codes to ids and lists the full tree

use sqlx::Row;
use uuid::Uuid;

use super::ConfigurationsDatabase;
use crate::errors::{AppError, AppResult};
use crate::models::access::{ClinicMatch, ClinicNode, LocationNode, ProgramNode};

impl ConfigurationsDatabase {
    pub(super) async fn migrate_hierarchy(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS programs (
                program_id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE COLLATE NOCASE,
                prefix TEXT NOT NULL UNIQUE COLLATE NOCASE,
                program_type TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS clinics (
                clinic_id TEXT PRIMARY KEY,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                code TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS locations (
                location_id TEXT PRIMARY KEY,
                clinic_id TEXT NOT NULL REFERENCES clinics(clinic_id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                code TEXT,
                status TEXT NOT NULL DEFAULT 'Active'
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_clinics_program ON clinics(program_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_locations_clinic ON locations(clinic_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create a program and return its id
    ///
    /// # Errors
    ///
    /// Returns `ResourceAlreadyExists` when the name or prefix is taken
    pub async fn create_program(
        &self,
        name: &str,
        prefix: &str,
        program_type: Option<&str>,
    ) -> AppResult<String> {
        let program_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO programs (program_id, name, prefix, program_type) VALUES ($1, $2, $3, $4)",
        )
        .bind(&program_id)
        .bind(name)
        .bind(prefix.to_uppercase())
        .bind(program_type)
        .execute(&self.pool)
        .await?;
        Ok(program_id)
    }

    /// Create a clinic within a program and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the program does not exist or the insert fails
    pub async fn create_clinic(
        &self,
        program_id: &str,
        name: &str,
        code: Option<&str>,
    ) -> AppResult<String> {
        let clinic_id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO clinics (clinic_id, program_id, name, code) VALUES ($1, $2, $3, $4)")
            .bind(&clinic_id)
            .bind(program_id)
            .bind(name)
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(clinic_id)
    }

    /// Create a location within a clinic and return its id
    ///
    /// # Errors
    ///
    /// Returns an error if the clinic does not exist or the insert fails
    pub async fn create_location(
        &self,
        clinic_id: &str,
        name: &str,
        code: Option<&str>,
    ) -> AppResult<String> {
        let location_id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO locations (location_id, clinic_id, name, code) VALUES ($1, $2, $3, $4)",
        )
        .bind(&location_id)
        .bind(clinic_id)
        .bind(name)
        .bind(code)
        .execute(&self.pool)
        .await?;
        Ok(location_id)
    }

    /// Resolve a program by name or prefix
    ///
    /// Exact (case-insensitive) name or prefix matches win; otherwise the
    /// first program whose name contains the input is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn resolve_program_id(&self, name_or_prefix: &str) -> AppResult<Option<String>> {
        if let Some(program_id) = self.get_program_id(name_or_prefix).await? {
            return Ok(Some(program_id));
        }

        let program_id = sqlx::query_scalar(
            r"
            SELECT program_id FROM programs
            WHERE instr(LOWER(name), LOWER($1)) > 0
            ORDER BY name
            LIMIT 1
            ",
        )
        .bind(name_or_prefix)
        .fetch_optional(&self.pool)
        .await?;
        Ok(program_id)
    }

    /// Program id for an exact (case-insensitive) prefix or name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_program_id(&self, prefix_or_name: &str) -> AppResult<Option<String>> {
        let program_id = sqlx::query_scalar(
            r"
            SELECT program_id FROM programs
            WHERE UPPER(prefix) = UPPER($1) OR LOWER(name) = LOWER($1)
            ORDER BY CASE WHEN UPPER(prefix) = UPPER($1) THEN 0 ELSE 1 END
            LIMIT 1
            ",
        )
        .bind(prefix_or_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(program_id)
    }

    /// Resolve a clinic within a program by partial name or exact code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn resolve_clinic_id(
        &self,
        clinic: &str,
        program_id: &str,
    ) -> AppResult<Option<String>> {
        let clinic_id = sqlx::query_scalar(
            r"
            SELECT clinic_id FROM clinics
            WHERE program_id = $1
              AND (instr(LOWER(name), LOWER($2)) > 0 OR UPPER(code) = UPPER($2))
            ORDER BY name
            LIMIT 1
            ",
        )
        .bind(program_id)
        .bind(clinic)
        .fetch_optional(&self.pool)
        .await?;
        Ok(clinic_id)
    }

    /// Find a clinic by partial name or exact code across every program
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_clinic(&self, clinic: &str) -> AppResult<Option<ClinicMatch>> {
        let found = sqlx::query_as::<_, ClinicMatch>(
            r"
            SELECT clinic_id, program_id, name FROM clinics
            WHERE instr(LOWER(name), LOWER($1)) > 0 OR UPPER(code) = UPPER($1)
            ORDER BY name
            LIMIT 1
            ",
        )
        .bind(clinic)
        .fetch_optional(&self.pool)
        .await?;
        Ok(found)
    }

    /// Resolve a location within a clinic by partial name or exact code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn resolve_location_id(
        &self,
        location: &str,
        clinic_id: &str,
    ) -> AppResult<Option<String>> {
        let location_id = sqlx::query_scalar(
            r"
            SELECT location_id FROM locations
            WHERE clinic_id = $1
              AND (instr(LOWER(name), LOWER($2)) > 0 OR UPPER(code) = UPPER($2))
            ORDER BY name
            LIMIT 1
            ",
        )
        .bind(clinic_id)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location_id)
    }

    /// Clinic id for an exact (case-insensitive) name or code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_clinic_id(&self, program_id: &str, clinic: &str) -> AppResult<Option<String>> {
        let clinic_id = sqlx::query_scalar(
            r"
            SELECT clinic_id FROM clinics
            WHERE program_id = $1 AND (LOWER(name) = LOWER($2) OR UPPER(code) = UPPER($2))
            LIMIT 1
            ",
        )
        .bind(program_id)
        .bind(clinic)
        .fetch_optional(&self.pool)
        .await?;
        Ok(clinic_id)
    }

    /// Location id for an exact (case-insensitive) name or code
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_location_id(
        &self,
        clinic_id: &str,
        location: &str,
    ) -> AppResult<Option<String>> {
        let location_id = sqlx::query_scalar(
            r"
            SELECT location_id FROM locations
            WHERE clinic_id = $1 AND (LOWER(name) = LOWER($2) OR UPPER(code) = UPPER($2))
            LIMIT 1
            ",
        )
        .bind(clinic_id)
        .bind(location)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location_id)
    }

    /// Display name of a program
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the program does not exist
    pub async fn program_name(&self, program_id: &str) -> AppResult<String> {
        sqlx::query_scalar("SELECT name FROM programs WHERE program_id = $1")
            .bind(program_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {program_id}")))
    }

    /// Display name of a clinic
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the clinic does not exist
    pub async fn clinic_name(&self, clinic_id: &str) -> AppResult<String> {
        sqlx::query_scalar("SELECT name FROM clinics WHERE clinic_id = $1")
            .bind(clinic_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Clinic {clinic_id}")))
    }

    /// Every program with its clinics and their locations, each level by name
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn list_programs(&self) -> AppResult<Vec<ProgramNode>> {
        let program_rows = sqlx::query(
            "SELECT program_id, name, prefix, program_type, status FROM programs ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut programs = Vec::with_capacity(program_rows.len());
        for row in program_rows {
            let program_id: String = row.get("program_id");
            let clinics = self.list_clinics(&program_id).await?;
            programs.push(ProgramNode {
                program_id,
                name: row.get("name"),
                prefix: row.get("prefix"),
                program_type: row.get("program_type"),
                status: row.get("status"),
                clinics,
            });
        }
        Ok(programs)
    }

    async fn list_clinics(&self, program_id: &str) -> AppResult<Vec<ClinicNode>> {
        let clinic_rows = sqlx::query(
            "SELECT clinic_id, name, code, status FROM clinics WHERE program_id = $1 ORDER BY name",
        )
        .bind(program_id)
        .fetch_all(&self.pool)
        .await?;

        let mut clinics = Vec::with_capacity(clinic_rows.len());
        for row in clinic_rows {
            let clinic_id: String = row.get("clinic_id");
            let locations = sqlx::query_as::<_, LocationNode>(
                r"
                SELECT location_id, name, code, status FROM locations
                WHERE clinic_id = $1
                ORDER BY name
                ",
            )
            .bind(&clinic_id)
            .fetch_all(&self.pool)
            .await?;

            clinics.push(ClinicNode {
                clinic_id,
                name: row.get("name"),
                code: row.get("code"),
                status: row.get("status"),
                locations,
            });
        }
        Ok(clinics)
    }
}
