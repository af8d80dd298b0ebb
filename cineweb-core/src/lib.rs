//! View-model logic of the CineWeb client.
//!
//! Everything in here is synchronous and free of browser APIs:
//! the frontend performs the network calls and feeds their
//! outcomes into the state machines of this crate.
//! Side effects that have to happen immediately (token storage,
//! map widget) are expressed as ports (traits) that the frontend
//! implements.

pub mod autocomplete;
pub mod bbox;
pub mod cinema;
pub mod config;
pub mod datetime;
pub mod error;
pub mod form;
pub mod loader;
pub mod modal;
pub mod notify;
pub mod rating;
pub mod render;
pub mod reviews;
pub mod session;

pub use cineweb_boundary as boundary;

pub use self::{
    config::Settings,
    error::Failure,
    loader::{LoadEffect, Resource},
    session::{SessionController, TokenStore, View},
};
