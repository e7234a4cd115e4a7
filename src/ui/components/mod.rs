pub mod authoring;
pub mod flashcard;
pub mod gap_view;
pub mod input_field;
pub mod lesson_list;
pub mod menu;
pub mod writing_view;
