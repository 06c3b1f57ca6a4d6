//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod auth_token;
pub mod delivery;
pub mod goal;
pub mod iteration;
pub mod need;
pub mod step;
pub mod user;

// Re-export specific types to avoid conflicts
pub use auth_token::{Column as AuthTokenColumn, Entity as AuthToken, Model as AuthTokenModel};
pub use delivery::{Column as DeliveryColumn, Entity as Delivery, Model as DeliveryModel};
pub use goal::{Column as GoalColumn, Entity as Goal, Model as GoalModel};
pub use iteration::{Column as IterationColumn, Entity as Iteration, Model as IterationModel};
pub use need::{Column as NeedColumn, Entity as Need, Model as NeedModel};
pub use step::{Column as StepColumn, Entity as Step, Model as StepModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
