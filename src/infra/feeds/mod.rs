pub mod http_feed_source;
