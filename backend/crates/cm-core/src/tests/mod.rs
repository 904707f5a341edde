mod identity_map;
