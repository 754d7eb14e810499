pub mod plotting;
pub mod show_this_pic;
