pub mod ojous;
