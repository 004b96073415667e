// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod accounts;
pub mod commands;
pub mod contacts;
pub mod crud;
pub mod dashboard;
pub mod detail;
pub mod forms;
pub mod ids;
pub mod knowledge;
pub mod model;
pub mod search;
pub mod state;
pub mod table;
pub mod views;

pub use commands::*;
pub use crud::*;
pub use dashboard::*;
pub use detail::*;
pub use forms::*;
pub use ids::*;
pub use knowledge::*;
pub use model::*;
pub use search::*;
pub use state::*;
pub use table::*;
pub use views::*;
