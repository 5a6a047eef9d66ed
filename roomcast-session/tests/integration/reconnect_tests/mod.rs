mod test_backoff_delays;
