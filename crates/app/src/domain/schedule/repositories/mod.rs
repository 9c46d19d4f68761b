//! Schedule repositories.

pub(crate) mod schedules;

pub(crate) use schedules::PgSchedulesRepository;
