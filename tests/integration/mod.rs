//! Integration tests for the backstack navigation controller

mod config_integration;
mod navigation_flows;
mod nested_containers;
mod test_utils;
