// SPDX-License-Identifier: Apache-2.0

pub mod activity_log;
pub mod config;
pub mod manager;
pub mod printer;
pub mod pyproject;
pub mod scanner;
pub mod status;
pub mod table;
pub mod tree;
pub mod types;
pub mod utils;
pub mod validation;
pub mod watcher;
