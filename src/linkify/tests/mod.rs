mod bulk_tests;
