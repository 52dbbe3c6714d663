/// Required input column names
pub const COL_DATE: &str = "date";
pub const COL_CITY: &str = "city";
pub const COL_TEMP_MEAN: &str = "temperature_2m_mean";
pub const COL_PRECIP_SUM: &str = "precipitation_sum";

/// Output column names
pub const OUT_COLUMNS: [&str; 5] = ["city", "year", "month", "temp_mean", "precip_sum"];

/// Directory layout relative to the project root
pub const DEFAULT_INPUT_DIR: &str = "data/input";
pub const DEFAULT_OUTPUT_DIR: &str = "data/output";

/// File names
pub const INPUT_FILE: &str = "uk_weather_clean.csv";
pub const OUTPUT_CSV_FILE: &str = "weather_monthly_summary.csv";
pub const OUTPUT_PARQUET_FILE: &str = "weather_monthly_summary.parquet";

/// Cell values read as missing, matching the usual CSV NA spellings
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
