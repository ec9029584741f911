mod support;

mod submission_tests;
