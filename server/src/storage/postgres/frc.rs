use api::{GroupId, TimeSeriesId};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::settings::config_model::UploadConfig;
use crate::storage::{
    ForecastGateway, ForecastRow, GroupDataRow, GroupRow, StorageError, TimeSerieRow,
};

const SELECT_GROUPS: &str = "SELECT g.group_data_id::bigint, b.branch_office_name::text, p.price_category_name::text
    FROM t_group g
    JOIN t_branch_office b
    ON g.branch_office_id = b.branch_office_id
    JOIN t_price_category p
    ON g.price_category_id = p.price_category_id";

/// Gateway to the `pk_frc` schema of a PostgreSQL database.
pub struct PgGateway {
    pool: Pool,
    upload: UploadConfig,
}

impl PgGateway {
    pub fn new(pool: Pool, upload: UploadConfig) -> Self {
        PgGateway { pool, upload }
    }

    fn load_table_ddl(&self) -> String {
        let filename = self.upload.load_file().to_string_lossy().replace('\'', "''");

        format!(
            "DROP FOREIGN TABLE IF EXISTS {table};
            CREATE FOREIGN TABLE {table} (
                \"Number\" NUMERIC,
                \"A\" NUMERIC,
                \"B\" NUMERIC,
                \"C\" NUMERIC
            )
            SERVER {server}
            OPTIONS (filename '{filename}', format 'csv', header 'true', delimiter ';', encoding 'UTF8');",
            table = self.upload.table_name,
            server = self.upload.foreign_server,
            filename = filename,
        )
    }
}

fn get_month(row: &Row, idx: usize) -> Result<u32, StorageError> {
    let month: i32 = row.try_get(idx)?;
    u32::try_from(month).map_err(|_| StorageError::Decode(format!("month {}", month)))
}

fn group_from_row(row: &Row) -> Result<GroupRow, StorageError> {
    Ok(GroupRow {
        id: row.try_get(0)?,
        branch_office: row.try_get(1)?,
        price_category: row.try_get(2)?,
    })
}

#[async_trait]
impl ForecastGateway for PgGateway {
    async fn ping(&self) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;

        Ok(())
    }

    async fn reload_load_table(&self) -> Result<(), StorageError> {
        let mut client = self.pool.get().await?;

        let trans = client.transaction().await?;
        trans.batch_execute(&self.load_table_ddl()).await?;
        trans.commit().await?;

        info!(
            "Load table {} now reads {}",
            self.upload.table_name,
            self.upload.load_file().display()
        );

        Ok(())
    }

    async fn select_groups(&self, limit: i64) -> Result<Vec<GroupRow>, StorageError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!("{} ORDER BY g.group_data_id LIMIT $1", SELECT_GROUPS),
                &[&limit],
            )
            .await?;

        rows.iter().map(group_from_row).collect()
    }

    async fn select_group(&self, id: GroupId) -> Result<Option<GroupRow>, StorageError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                &format!("{} WHERE g.group_data_id = $1::bigint", SELECT_GROUPS),
                &[&id],
            )
            .await?;

        rows.first().map(group_from_row).transpose()
    }

    async fn select_group_data(&self, id: GroupId, limit: i64) -> Result<Vec<GroupDataRow>, StorageError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT group_data_id::bigint, volume::float8, year::int, month::int
                    FROM t_group_data
                    WHERE group_data_id = $1::bigint
                    ORDER BY year, month
                    LIMIT $2",
                &[&id, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<GroupDataRow, StorageError> {
                Ok(GroupDataRow {
                    id: row.try_get(0)?,
                    volume: row.try_get(1)?,
                    year: row.try_get(2)?,
                    month: get_month(row, 3)?,
                })
            })
            .collect()
    }

    async fn param_test(&self, group_data_id: GroupId, year_init: i32) -> Result<(), StorageError> {
        let client = self.pool.get().await?;

        client
            .execute(
                "CALL pk_frc.param_test(p_group_data_id => $1, p_year_init => $2)",
                &[&group_data_id, &year_init],
            )
            .await?;

        Ok(())
    }

    async fn select_time_series(
        &self,
        group_data_id: GroupId,
        limit: i64,
    ) -> Result<Vec<TimeSerieRow>, StorageError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT ts.time_serie_id::bigint, ts.group_data_id::bigint,
                        alpha::float8, beta::float8, gamma::float8,
                        round(mse::numeric, 3)::float8, round(mape::numeric, 3)::float8
                    FROM t_time_serie ts
                    JOIN t_param_set p
                    ON ts.param_set_id = p.param_set_id
                    WHERE ts.group_data_id = $1::bigint
                    ORDER BY mape
                    LIMIT $2",
                &[&group_data_id, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<TimeSerieRow, StorageError> {
                Ok(TimeSerieRow {
                    time_serie_id: row.try_get(0)?,
                    group_data_id: row.try_get(1)?,
                    alpha: row.try_get(2)?,
                    beta: row.try_get(3)?,
                    gamma: row.try_get(4)?,
                    mse: row.try_get(5)?,
                    mape: row.try_get(6)?,
                })
            })
            .collect()
    }

    async fn predict(
        &self,
        serie_id: TimeSeriesId,
        year_init: i32,
        month_init: u32,
        predict_num: u32,
    ) -> Result<(), StorageError> {
        let client = self.pool.get().await?;

        let month_init = month_init as i32;
        let predict_num = predict_num as i32;

        client
            .execute(
                "CALL pk_frc.predict(
                    p_serie_id => $1,
                    p_year_init => $2,
                    p_month_init => $3,
                    p_predict_num => $4)",
                &[&serie_id, &year_init, &month_init, &predict_num],
            )
            .await?;

        Ok(())
    }

    async fn select_forecast(&self, serie_id: TimeSeriesId, limit: i64) -> Result<Vec<ForecastRow>, StorageError> {
        let client = self.pool.get().await?;

        let rows = client
            .query(
                "SELECT year::int, month::int, real_value::float8,
                        round(smooth_value::numeric, 3)::float8, round(predict_value::numeric, 3)::float8
                    FROM t_forecast
                    WHERE time_serie_id = $1::bigint
                    ORDER BY year, month
                    LIMIT $2",
                &[&serie_id, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| -> Result<ForecastRow, StorageError> {
                Ok(ForecastRow {
                    year: row.try_get(0)?,
                    month: get_month(row, 1)?,
                    real_value: row.try_get(2)?,
                    smooth_value: row.try_get(3)?,
                    predict_value: row.try_get(4)?,
                })
            })
            .collect()
    }
}
