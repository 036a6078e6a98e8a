pub mod list_view;
pub mod statusbar;
pub mod sub_tabs;
pub mod text_field;
pub mod viewport;
