//! Read-only catalog lookups. Nothing here writes to the store.

use uuid::Uuid;

use crate::{Result, db::Db, models::SwitchRecord};

const SWITCH_COLUMNS: &str = "\
	switch_id,
	name,
	manufacturer,
	switch_type,
	top_housing,
	bottom_housing,
	stem,
	mount,
	spring,
	actuation_force_g,
	bottom_out_force_g,
	pre_travel_mm,
	total_travel_mm,
	updated_at";

pub async fn get_switch_by_exact_name(db: &Db, name: &str) -> Result<Option<SwitchRecord>> {
	let sql = format!(
		"\
SELECT
{SWITCH_COLUMNS}
FROM switches
WHERE name = $1
LIMIT 1"
	);
	let row = sqlx::query_as::<_, SwitchRecord>(&sql).bind(name).fetch_optional(&db.pool).await?;

	Ok(row)
}

pub async fn get_switch_by_case_insensitive_name(
	db: &Db,
	name: &str,
) -> Result<Option<SwitchRecord>> {
	let sql = format!(
		"\
SELECT
{SWITCH_COLUMNS}
FROM switches
WHERE lower(name) = lower($1)
ORDER BY name ASC
LIMIT 1"
	);
	let row = sqlx::query_as::<_, SwitchRecord>(&sql).bind(name).fetch_optional(&db.pool).await?;

	Ok(row)
}

/// Case-insensitive containment in either direction, shortest names first.
pub async fn find_switches_by_substring(
	db: &Db,
	fragment: &str,
	limit: u32,
) -> Result<Vec<SwitchRecord>> {
	let sql = format!(
		"\
SELECT
{SWITCH_COLUMNS}
FROM switches
WHERE strpos(lower(name), lower($1)) > 0
	OR strpos(lower($1), lower(name)) > 0
ORDER BY length(name) ASC, name ASC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, SwitchRecord>(&sql)
		.bind(fragment)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Keyword match on name or manufacturer, ranked exact name first, then earliest match position.
pub async fn keyword_search_switches(
	db: &Db,
	fragment: &str,
	limit: u32,
) -> Result<Vec<SwitchRecord>> {
	let sql = format!(
		"\
SELECT
{SWITCH_COLUMNS}
FROM switches
WHERE strpos(lower(name), lower($1)) > 0
	OR strpos(lower(coalesce(manufacturer, '')), lower($1)) > 0
ORDER BY
	(lower(name) = lower($1)) DESC,
	CASE WHEN strpos(lower(name), lower($1)) > 0 THEN strpos(lower(name), lower($1)) ELSE 2147483647 END ASC,
	length(name) ASC,
	name ASC
LIMIT $2"
	);
	let rows = sqlx::query_as::<_, SwitchRecord>(&sql)
		.bind(fragment)
		.bind(i64::from(limit))
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

/// Rows for the given ids, in no particular order.
pub async fn get_switches_by_ids(db: &Db, ids: &[Uuid]) -> Result<Vec<SwitchRecord>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let sql = format!(
		"\
SELECT
{SWITCH_COLUMNS}
FROM switches
WHERE switch_id = ANY($1)"
	);
	let rows = sqlx::query_as::<_, SwitchRecord>(&sql).bind(ids).fetch_all(&db.pool).await?;

	Ok(rows)
}
