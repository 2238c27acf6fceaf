mod otp_session_tests;
