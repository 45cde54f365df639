//! Repository implementations of the domain store traits.

pub mod application;
pub mod official;

pub use application::ApplicationRepository;
pub use official::OfficialRepository;

use domain::services::StoreError;

/// Any database failure means the store cannot serve the read.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Store query failed");
    StoreError::Unavailable(err.to_string())
}

/// Convert rows, dropping (and logging) any that fail domain validation.
pub(crate) fn convert_rows<E, T>(rows: Vec<E>, table: &'static str) -> Vec<T>
where
    T: TryFrom<E, Error = String>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(reason) => {
                tracing::warn!(table, reason = %reason, "Skipping unreadable row");
                None
            }
        })
        .collect()
}
