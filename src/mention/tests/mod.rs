mod policy_tests;
