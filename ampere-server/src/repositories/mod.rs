mod bill;

pub use bill::BillRepository;
