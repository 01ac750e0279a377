mod blogs;
