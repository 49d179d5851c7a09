// Read-only access to the EduLingua store
//
// The store is a Supabase project exposed through PostgREST. This module owns
// the query gateway: parameterized filtered reads, exact counts and the
// constrained raw-query escape hatch. Nothing here mutates data.

mod client;
mod query;
mod validate;

pub use client::SupabaseClient;
pub use query::{Filter, OrderDirection, TableQuery};
pub use validate::{validate_read_only, ValidationError};
