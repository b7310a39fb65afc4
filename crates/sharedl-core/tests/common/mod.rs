pub mod share_server;
