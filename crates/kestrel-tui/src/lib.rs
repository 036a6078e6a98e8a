//! `kestrel`: terminal console for streaming-data clusters.
//!
//! The UI is a single-task loop over [`action::Action`]s. Pages never
//! perform cluster I/O themselves: they return [`command::Command`]s,
//! which the [`command::Dispatcher`] runs on the tokio worker pool under a
//! timeout and feeds back into the loop as ordinary actions.
//!
//! Each resource area is a [`tabs::Tab`] that owns exactly one active
//! [`page::Page`] and swaps it on `Load*Page` actions. Every list page is
//! built on [`widgets::list_view::ListView`], so sorting, filtering and
//! selection behave the same everywhere. The status bar is recomputed from
//! the active page on every frame.

pub mod action;
pub mod app;
pub mod command;
pub mod event;
pub mod page;
pub mod pages;
pub mod tabs;
pub mod theme;
pub mod tui;
pub mod widgets;
