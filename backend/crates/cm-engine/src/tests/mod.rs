mod job_progress;
