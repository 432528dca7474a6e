pub mod ws_session;
