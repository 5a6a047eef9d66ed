mod test_invalid_frames;
