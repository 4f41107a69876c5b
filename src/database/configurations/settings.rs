// ABOUTME: Configuration definitions and scoped values with inheritance resolution
// ABOUTME: Resolves a key through default, program, clinic and location levels

use uuid::Uuid;

use super::ConfigurationsDatabase;
use crate::errors::AppResult;
use crate::models::access::{ConfigLevel, ConfigResolution};

impl ConfigurationsDatabase {
    pub(super) async fn migrate_settings(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS config_definitions (
                config_key TEXT PRIMARY KEY,
                display_name TEXT,
                category TEXT,
                default_value TEXT,
                description TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS config_values (
                value_id TEXT PRIMARY KEY,
                config_key TEXT NOT NULL,
                program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
                clinic_id TEXT REFERENCES clinics(clinic_id) ON DELETE CASCADE,
                location_id TEXT REFERENCES locations(location_id) ON DELETE CASCADE,
                value TEXT,
                UNIQUE(config_key, program_id, clinic_id, location_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_config_values_key ON config_values(config_key, program_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Define (or redefine) a configuration key
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails
    pub async fn define_config(
        &self,
        config_key: &str,
        display_name: &str,
        category: Option<&str>,
        default_value: Option<&str>,
        description: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO config_definitions (config_key, display_name, category, default_value, description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(config_key) DO UPDATE SET
                display_name = excluded.display_name,
                category = excluded.category,
                default_value = excluded.default_value,
                description = excluded.description
            ",
        )
        .bind(config_key)
        .bind(display_name)
        .bind(category)
        .bind(default_value)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Set a value at exactly one scope, replacing any value already there
    ///
    /// # Errors
    ///
    /// Returns an error if the scope does not exist or a statement fails
    pub async fn set_config_value(
        &self,
        config_key: &str,
        program_id: &str,
        clinic_id: Option<&str>,
        location_id: Option<&str>,
        value: &str,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // UNIQUE does not collapse NULL scope columns, so replace by hand
        sqlx::query(
            r"
            DELETE FROM config_values
            WHERE config_key = $1 AND program_id = $2 AND clinic_id IS $3 AND location_id IS $4
            ",
        )
        .bind(config_key)
        .bind(program_id)
        .bind(clinic_id)
        .bind(location_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO config_values (value_id, config_key, program_id, clinic_id, location_id, value)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(config_key)
        .bind(program_id)
        .bind(clinic_id)
        .bind(location_id)
        .bind(value)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Resolve a key through the hierarchy down to the given scope
    ///
    /// Returns `None` when no level in scope has a value.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails
    pub async fn resolve_with_inheritance(
        &self,
        config_key: &str,
        program_id: &str,
        clinic_id: Option<&str>,
        location_id: Option<&str>,
    ) -> AppResult<Option<ConfigResolution>> {
        let default_value: Option<Option<String>> = sqlx::query_scalar(
            "SELECT default_value FROM config_definitions WHERE config_key = $1",
        )
        .bind(config_key)
        .fetch_optional(&self.pool)
        .await?;

        let mut levels = vec![(ConfigLevel::Default, default_value.flatten())];
        levels.push((
            ConfigLevel::Program,
            self.value_at(config_key, program_id, None, None).await?,
        ));
        if let Some(clinic_id) = clinic_id {
            levels.push((
                ConfigLevel::Clinic,
                self.value_at(config_key, program_id, Some(clinic_id), None)
                    .await?,
            ));
            if let Some(location_id) = location_id {
                levels.push((
                    ConfigLevel::Location,
                    self.value_at(config_key, program_id, Some(clinic_id), Some(location_id))
                        .await?,
                ));
            }
        }

        Ok(ConfigResolution::from_levels(config_key, levels))
    }

    async fn value_at(
        &self,
        config_key: &str,
        program_id: &str,
        clinic_id: Option<&str>,
        location_id: Option<&str>,
    ) -> AppResult<Option<String>> {
        let value: Option<Option<String>> = sqlx::query_scalar(
            r"
            SELECT value FROM config_values
            WHERE config_key = $1 AND program_id = $2 AND clinic_id IS $3 AND location_id IS $4
            LIMIT 1
            ",
        )
        .bind(config_key)
        .bind(program_id)
        .bind(clinic_id)
        .bind(location_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(value.flatten())
    }
}
