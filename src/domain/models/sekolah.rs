use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A school record. Location ids point at the country → province → city →
/// district → village → dusun hierarchy and are all optional.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Sekolah {
    pub id: i64,
    pub npsn: Option<String>,
    pub name: String,
    pub tahun_berdiri: String,
    pub akreditasi: String,
    pub kategori_keilmuan: String,
    pub jenjang_sekolah: String,
    pub jenis_ptn_pts: String,
    pub address: String,
    pub country_id: Option<i64>,
    pub province_id: Option<i64>,
    pub city_id: Option<i64>,
    pub district_id: Option<i64>,
    pub village_id: Option<i64>,
    pub dusun_id: Option<i64>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub altitude: Option<String>,
    pub precision: Option<String>,
    pub zip_code: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub no_telp: Option<String>,
    pub no_fax: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
