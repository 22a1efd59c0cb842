pub mod cli {
    pub mod shell;
    pub mod utils;
}

pub mod policy {
    pub mod fifo;
    pub mod lfu;
    pub mod lru;
    pub mod replacement;
    pub mod s3fifo;
}

pub mod memory {
    pub mod address;
    pub mod frame_allocator;
    pub mod page_table;
    pub mod tlb;
}

pub mod sim {
    pub mod config;
    pub mod error;
    pub mod runner;
    pub mod stats;
    pub mod trace;
    pub mod translator;
}
