pub mod recyclebin;
