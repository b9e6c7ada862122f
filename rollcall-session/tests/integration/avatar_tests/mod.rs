mod test_rebound_slot;
