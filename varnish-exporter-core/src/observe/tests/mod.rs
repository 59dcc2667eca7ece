mod builder_tests;
