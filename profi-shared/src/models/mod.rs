/// Database models for ProFi
///
/// Every record is scoped to one username (the partition key supplied
/// explicitly by the presentation layer); only quotes are shared.
///
/// # Models
///
/// - `user`: identity records and credential operations
/// - `admin`: the quote-management allow-list
/// - `budget`: planned amounts and the append-only transaction log
/// - `goal`: savings goals with atomic contributions
/// - `quote`: motivational quotes with random selection
/// - `interaction`: completed chat exchanges

pub mod admin;
pub mod budget;
pub mod goal;
pub mod interaction;
pub mod quote;
pub mod user;
