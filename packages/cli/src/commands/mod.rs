pub mod edit;
pub mod init;
pub mod pages;

pub use edit::{
    add_block, move_block, remove, set_status, set_value, AddBlockArgs, MoveArgs, RemoveArgs,
    SetValueArgs, StatusArgs,
};
pub use init::{init, InitArgs};
pub use pages::{blocks, pages, seed, BlocksArgs};
