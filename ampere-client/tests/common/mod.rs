pub mod mock_monitor;
