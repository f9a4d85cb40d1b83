mod common;
mod players;
