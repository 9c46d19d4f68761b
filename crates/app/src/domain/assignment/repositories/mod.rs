//! Assignment repositories.

pub(crate) mod drivers;
pub(crate) mod orders;

pub(crate) use drivers::PgDriversRepository;
pub(crate) use orders::PgOrdersRepository;
