mod test_staged_media;
